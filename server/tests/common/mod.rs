#![allow(dead_code)]

use std::{path::PathBuf, thread::JoinHandle};

use io_error::IOError;
use shared_fs::NUMSECTORS;
use yfs::{DEFAULT_NUM_INODES, Filesystem, FsConfig, MemDisk, format};
use yfs_server::{ChannelClient, Dispatcher, channel, serve};

pub fn dispatcher() -> Dispatcher<MemDisk> {
    let mut disk = MemDisk::new(NUMSECTORS);
    format(&mut disk, DEFAULT_NUM_INODES).expect("format an empty disk");
    Dispatcher::new(Filesystem::mount(disk, FsConfig::default()).expect("mount a fresh disk"))
}

pub type Running = JoinHandle<(Result<(), IOError>, MemDisk)>;

/// Runs a server over an in-process channel on its own thread. Joining it
/// gives back the result of the loop and the disk.
pub fn start() -> (ChannelClient, Running) {
    let (mut transport, client) = channel();
    let mut dispatcher = dispatcher();
    let server = std::thread::spawn(move || {
        let result = serve(&mut dispatcher, &mut transport);
        (result, dispatcher.into_filesystem().into_disk())
    });
    (client, server)
}

/// A socket path unique to this test process.
pub fn socket_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("yfs-{}-{name}.sock", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}
