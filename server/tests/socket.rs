use std::{
    io::{BufReader, Write},
    os::unix::net::UnixStream,
};

use io_error::IOError;
use yfs_protocol::{Reply, Request, read_message, write_message};
use yfs_server::{UnixTransport, serve};

mod common;

use common::{dispatcher, socket_path};

#[test]
pub fn malformed_lines_get_a_protocol_error() {
    let path = socket_path("malformed");
    let mut transport = UnixTransport::bind(&path).unwrap();
    let mut dispatcher = dispatcher();
    let server = std::thread::spawn(move || serve(&mut dispatcher, &mut transport));

    let stream = UnixStream::connect(&path).unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;

    writer.write_all(b"{\"op\":\"Explode\"}\n").unwrap();
    let reply: Reply = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(Reply::error(IOError::Protocol), reply);

    write_message(&mut writer, &Request::Sync).unwrap();
    let reply: Reply = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(Reply::ok(0), reply);

    write_message(&mut writer, &Request::Shutdown).unwrap();
    let reply: Reply = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(Reply::ok(0), reply);

    assert_eq!(Ok(()), server.join().unwrap());
    assert!(!path.exists());
}
