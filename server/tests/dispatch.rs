use io_error::IOError;
use shared_fs::{FileType, ROOTINODE, Whence};
use yfs::{Filesystem, FsConfig};
use yfs_protocol::{Call, Payload, Reply, Request};
use yfs_server::{channel, serve};

mod common;

use common::{dispatcher, start};

fn create(client: &mut impl Call, path: &str) -> u32 {
    let reply = client
        .call(Request::Create {
            cwd: ROOTINODE,
            path: path.into(),
        })
        .unwrap();
    u32::try_from(reply.result).expect("an inode number")
}

#[test]
pub fn requests_are_served_in_order() {
    let (mut client, server) = start();

    let inode = create(&mut client, "/notes");
    let written = client
        .call(Request::Write {
            inode,
            offset: 0,
            data: b"hello yfs".to_vec(),
        })
        .unwrap();
    assert_eq!(Reply::ok(9), written);

    let read = client
        .call(Request::Read {
            inode,
            offset: 6,
            len: 100,
        })
        .unwrap();
    assert_eq!(Reply::bytes(b"yfs".to_vec()), read);

    let stat = client
        .call(Request::Stat {
            cwd: ROOTINODE,
            path: "/notes".into(),
        })
        .unwrap();
    let Payload::Stat(stat) = stat.payload else {
        panic!("stat without a stat payload: {stat:?}");
    };
    assert_eq!((inode, FileType::RegularFile, 9, 1), (stat.inum, stat.file_type, stat.size, stat.nlink));

    assert_eq!(Reply::ok(0), client.call(Request::Shutdown).unwrap());
    let (result, disk) = server.join().unwrap();
    assert_eq!(Ok(()), result);

    let mut fs = Filesystem::mount(disk, FsConfig::default()).unwrap();
    let inum = fs.open("/notes", ROOTINODE).unwrap();
    assert_eq!(b"hello yfs".to_vec(), fs.read(inum, 0, 100).unwrap());
}

#[test]
pub fn errors_travel_as_negative_codes() {
    let (mut client, server) = start();

    let missing = client
        .call(Request::Open {
            cwd: ROOTINODE,
            path: "/missing".into(),
        })
        .unwrap();
    assert_eq!(IOError::NotFound.to_result_code(), missing.result);
    assert_eq!(Err(IOError::NotFound), missing.into_result());

    let inode = create(&mut client, "/f");
    let negative = client
        .call(Request::Read {
            inode,
            offset: -1,
            len: 1,
        })
        .unwrap();
    assert_eq!(Reply::error(IOError::InvalidArgument), negative);

    let bad_seek = client
        .call(Request::Seek {
            inode,
            position: 0,
            offset: 1,
            whence: Whence::End,
        })
        .unwrap();
    assert_eq!(Reply::error(IOError::InvalidArgument), bad_seek);

    let loop_reply = client
        .call(Request::ReadLink {
            cwd: ROOTINODE,
            path: "/f".into(),
            len: 10,
        })
        .unwrap();
    assert_eq!(Reply::error(IOError::NotASymlink), loop_reply);

    client.call(Request::Shutdown).unwrap();
    assert_eq!(Ok(()), server.join().unwrap().0);
}

#[test]
pub fn directory_requests() {
    let (mut client, server) = start();

    let ok = |reply: Result<Reply, IOError>| reply.unwrap().into_result().map(|(n, _)| n);

    assert_eq!(
        Ok(0),
        ok(client.call(Request::MkDir {
            cwd: ROOTINODE,
            path: "/d".into()
        }))
    );
    let dir = ok(client.call(Request::ChDir {
        cwd: ROOTINODE,
        path: "d".into(),
    }))
    .unwrap();
    let dir = u32::try_from(dir).unwrap();
    assert_ne!(ROOTINODE, dir);

    assert_eq!(
        Ok(0),
        ok(client.call(Request::SymLink {
            cwd: dir,
            target: "../d".into(),
            path: "self".into()
        }))
    );
    let target = client
        .call(Request::ReadLink {
            cwd: dir,
            path: "self".into(),
            len: 3,
        })
        .unwrap();
    assert_eq!(Reply::bytes(b"../".to_vec()), target);

    assert_eq!(
        Err(IOError::DirectoryNotEmpty),
        ok(client.call(Request::RmDir {
            cwd: ROOTINODE,
            path: "/d".into()
        }))
    );
    assert_eq!(
        Ok(0),
        ok(client.call(Request::Unlink {
            cwd: dir,
            path: "self".into()
        }))
    );
    assert_eq!(
        Ok(0),
        ok(client.call(Request::RmDir {
            cwd: ROOTINODE,
            path: "/d".into()
        }))
    );
    assert_eq!(Ok(0), ok(client.call(Request::Sync)));

    client.call(Request::Shutdown).unwrap();
    assert_eq!(Ok(()), server.join().unwrap().0);
}

#[test]
pub fn disk_failure_stops_the_server() {
    let mut dispatcher = dispatcher();
    let created = dispatcher.dispatch(&Request::Create {
        cwd: ROOTINODE,
        path: "/f".into(),
    });
    assert!(created.result > 0);
    dispatcher.filesystem_mut().disk_mut().set_failing(true);

    let (mut transport, mut client) = channel();
    let caller = std::thread::spawn(move || {
        let first = client.call(Request::Sync);
        let second = client.call(Request::Sync);
        (first, second)
    });

    assert_eq!(Err(IOError::DiskFailure), serve(&mut dispatcher, &mut transport));
    assert_eq!(Some(IOError::DiskFailure), dispatcher.fatal());
    drop(transport);

    let (first, second) = caller.join().unwrap();
    assert_eq!(Ok(Reply::error(IOError::DiskFailure)), first);
    assert_eq!(Err(IOError::Protocol), second);
}

#[test]
pub fn losing_every_client_is_an_error() {
    let mut dispatcher = dispatcher();
    let (mut transport, client) = channel();
    drop(client);
    assert_eq!(Err(IOError::Protocol), serve(&mut dispatcher, &mut transport));
    assert!(!dispatcher.is_shut_down());
}
