#![allow(dead_code)]

use std::{os::unix::net::UnixStream, path::PathBuf, thread::JoinHandle};

use io_error::IOError;
use shared_fs::NUMSECTORS;
use yfs::{DEFAULT_NUM_INODES, Filesystem, FsConfig, MemDisk, format};
use yfs_client::Client;
use yfs_protocol::Connection;
use yfs_server::{Dispatcher, UnixTransport, serve};

pub type SocketClient = Client<Connection<UnixStream, UnixStream>>;

pub struct Server {
    pub path: PathBuf,
    pub handle: JoinHandle<(Result<(), IOError>, MemDisk)>,
}

/// Starts a server on a fresh socket backed by a freshly formatted disk.
pub fn start(name: &str, config: FsConfig) -> Server {
    let path = std::env::temp_dir().join(format!("yfs-client-{}-{name}.sock", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut disk = MemDisk::new(NUMSECTORS);
    format(&mut disk, DEFAULT_NUM_INODES).expect("format an empty disk");
    let fs = Filesystem::mount(disk, config).expect("mount a fresh disk");

    let mut transport = UnixTransport::bind(&path).expect("bind a temporary socket");
    let handle = std::thread::spawn(move || {
        let mut dispatcher = Dispatcher::new(fs);
        let result = serve(&mut dispatcher, &mut transport);
        (result, dispatcher.into_filesystem().into_disk())
    });

    Server { path, handle }
}

pub fn connect(server: &Server) -> SocketClient {
    let stream = UnixStream::connect(&server.path).expect("connect to the server");
    let reader = stream.try_clone().expect("clone the stream");
    Client::new(Connection::new(reader, stream))
}
