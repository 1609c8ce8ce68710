use io_error::IOError;
use shared_fs::{DIRENTRY_SIZE, FileType, ROOTINODE};
use yfs::FsConfig;

mod common;

use common::fs::{default_fs, mounted, tiny_caches};

#[test]
pub fn create_write_read_unlink() {
    for config in [FsConfig::default(), tiny_caches()] {
        let mut fs = mounted(config);
        fs.mkdir("/a", ROOTINODE).unwrap();
        let x = fs.create("/a/x.txt", ROOTINODE).unwrap();

        assert_eq!(5, fs.write(x, 0, b"hello").unwrap());
        assert_eq!(b"hello".to_vec(), fs.read(x, 0, 5).unwrap());

        fs.unlink("/a/x.txt", ROOTINODE).unwrap();
        assert_eq!(Err(IOError::NotFound), fs.open("/a/x.txt", ROOTINODE));
    }
}

#[test]
pub fn symlink_resolves_to_target() {
    let mut fs = default_fs();
    fs.mkdir("/a", ROOTINODE).unwrap();
    let x = fs.create("/a/x.txt", ROOTINODE).unwrap();
    fs.symlink("x.txt", "/a/y", ROOTINODE).unwrap();

    assert_eq!(x, fs.open("/a/y", ROOTINODE).unwrap());
    assert_eq!(x, fs.open("/a/x.txt", ROOTINODE).unwrap());
    assert_eq!(b"x.txt".to_vec(), fs.readlink("/a/y", ROOTINODE, 100).unwrap());
    assert_eq!(b"x.t".to_vec(), fs.readlink("/a/y", ROOTINODE, 3).unwrap());
    assert_eq!(Err(IOError::NotASymlink), fs.readlink("/a/x.txt", ROOTINODE, 10));
}

#[test]
pub fn rmdir_only_when_empty() {
    let mut fs = default_fs();
    let free_inodes = fs.free_inode_count();
    let free_blocks = fs.free_block_count();

    fs.mkdir("/d", ROOTINODE).unwrap();
    fs.create("/d/f", ROOTINODE).unwrap();
    assert_eq!(Err(IOError::DirectoryNotEmpty), fs.rmdir("/d", ROOTINODE));

    fs.unlink("/d/f", ROOTINODE).unwrap();
    // only live entries count, so a directory left with nothing but
    // the tombstone from unlink is empty even though its size says 3 entries
    assert!(fs.stat("/d", ROOTINODE).unwrap().size > 2 * DIRENTRY_SIZE as u32);
    fs.rmdir("/d", ROOTINODE).unwrap();

    assert_eq!(Err(IOError::NotFound), fs.open("/d", ROOTINODE));
    assert_eq!(free_inodes, fs.free_inode_count());
    assert_eq!(free_blocks, fs.free_block_count());
}

#[test]
pub fn rmdir_refusals() {
    let mut fs = default_fs();
    fs.mkdir("/d", ROOTINODE).unwrap();
    fs.create("/f", ROOTINODE).unwrap();

    assert_eq!(Err(IOError::Busy), fs.rmdir("/", ROOTINODE));
    assert_eq!(Err(IOError::Busy), fs.rmdir("/d/.", ROOTINODE));
    assert_eq!(Err(IOError::Busy), fs.rmdir("/d/..", ROOTINODE));
    assert_eq!(Err(IOError::NotADirectory), fs.rmdir("/f", ROOTINODE));
    assert_eq!(Err(IOError::NotFound), fs.rmdir("/nope", ROOTINODE));
}

#[test]
pub fn mkdir_wires_dot_entries() {
    let mut fs = default_fs();
    let a = fs.mkdir("/a", ROOTINODE).unwrap();
    let b = fs.mkdir("/a/b", ROOTINODE).unwrap();

    assert_eq!(a, fs.open("/a/b/..", ROOTINODE).unwrap());
    assert_eq!(b, fs.open("/a/b/.", ROOTINODE).unwrap());
    assert_eq!(ROOTINODE, fs.open("/a/..", ROOTINODE).unwrap());

    let stat = fs.stat("/a/b", ROOTINODE).unwrap();
    assert_eq!(FileType::Directory, stat.file_type);
    assert_eq!(1, stat.nlink);
    assert_eq!(2 * DIRENTRY_SIZE as u32, stat.size);

    assert_eq!(Err(IOError::AlreadyExists), fs.mkdir("/a", ROOTINODE));
    assert_eq!(
        vec![(".".to_owned(), b), ("..".to_owned(), a)],
        fs.read_dir("/a/b", ROOTINODE).unwrap()
    );
}

#[test]
pub fn create_truncates_existing_files() {
    let mut fs = default_fs();
    let f = fs.create("/f", ROOTINODE).unwrap();
    fs.write(f, 0, &[1; 2000]).unwrap();
    let free_blocks = fs.free_block_count();

    assert_eq!(f, fs.create("/f", ROOTINODE).unwrap());
    assert_eq!(0, fs.stat("/f", ROOTINODE).unwrap().size);
    assert_eq!(free_blocks + 4, fs.free_block_count());
    assert!(fs.read(f, 0, 10).unwrap().is_empty());
}

#[test]
pub fn create_refusals() {
    let mut fs = default_fs();
    fs.mkdir("/d", ROOTINODE).unwrap();
    fs.symlink("/d", "/s", ROOTINODE).unwrap();
    fs.create("/f", ROOTINODE).unwrap();

    assert_eq!(Err(IOError::IsADirectory), fs.create("/d", ROOTINODE));
    assert_eq!(Err(IOError::NotARegularFile), fs.create("/s", ROOTINODE));
    assert_eq!(Err(IOError::NotADirectory), fs.create("/f/x", ROOTINODE));
    assert_eq!(Err(IOError::NotFound), fs.create("/nope/x", ROOTINODE));
    assert_eq!(
        Err(IOError::InvalidArgument),
        fs.create(&format!("/{}", "n".repeat(31)), ROOTINODE)
    );
    assert_eq!(Err(IOError::InvalidArgument), fs.create("/", ROOTINODE));
}

#[test]
pub fn link_counts_follow_entries() {
    let mut fs = default_fs();
    let f = fs.create("/f", ROOTINODE).unwrap();
    fs.write(f, 0, b"shared").unwrap();
    fs.mkdir("/d", ROOTINODE).unwrap();

    fs.link("/f", "/d/g", ROOTINODE).unwrap();
    fs.link("/d/g", "/h", ROOTINODE).unwrap();
    assert_eq!(3, fs.stat("/f", ROOTINODE).unwrap().nlink);
    assert_eq!(f, fs.open("/d/g", ROOTINODE).unwrap());

    assert_eq!(Err(IOError::AlreadyExists), fs.link("/f", "/h", ROOTINODE));
    assert_eq!(Err(IOError::IsADirectory), fs.link("/d", "/e", ROOTINODE));

    fs.unlink("/f", ROOTINODE).unwrap();
    fs.unlink("/h", ROOTINODE).unwrap();
    assert_eq!(1, fs.stat("/d/g", ROOTINODE).unwrap().nlink);
    assert_eq!(b"shared".to_vec(), fs.read(f, 0, 100).unwrap());

    let free_inodes = fs.free_inode_count();
    fs.unlink("/d/g", ROOTINODE).unwrap();
    assert_eq!(free_inodes + 1, fs.free_inode_count());
    assert_eq!(Err(IOError::NotFound), fs.read(f, 0, 1));
}

#[test]
pub fn unlink_refusals() {
    let mut fs = default_fs();
    fs.mkdir("/d", ROOTINODE).unwrap();
    assert_eq!(Err(IOError::IsADirectory), fs.unlink("/d", ROOTINODE));
    assert_eq!(Err(IOError::NotFound), fs.unlink("/x", ROOTINODE));
}

#[test]
pub fn unlink_removes_the_link_not_the_target() {
    let mut fs = default_fs();
    let f = fs.create("/f", ROOTINODE).unwrap();
    fs.symlink("/f", "/l", ROOTINODE).unwrap();
    fs.unlink("/l", ROOTINODE).unwrap();
    assert_eq!(f, fs.open("/f", ROOTINODE).unwrap());
    assert_eq!(Err(IOError::NotFound), fs.open("/l", ROOTINODE));
}

#[test]
pub fn relative_paths_and_chdir() {
    let mut fs = default_fs();
    let a = fs.mkdir("/a", ROOTINODE).unwrap();
    let f = fs.create("/f", ROOTINODE).unwrap();

    assert_eq!(a, fs.chdir("a", ROOTINODE).unwrap());
    let x = fs.create("x", a).unwrap();
    assert_eq!(x, fs.open("/a/x", ROOTINODE).unwrap());
    assert_eq!(f, fs.open("../f", a).unwrap());
    assert_eq!(f, fs.open("/f", a).unwrap());

    assert_eq!(Err(IOError::NotADirectory), fs.chdir("/f", ROOTINODE));
    assert_eq!(Err(IOError::NotFound), fs.chdir("/zz", ROOTINODE));
}

#[test]
pub fn seek_stays_within_the_file() {
    use shared_fs::Whence;

    let mut fs = default_fs();
    let f = fs.create("/f", ROOTINODE).unwrap();
    fs.write(f, 0, &[0; 100]).unwrap();

    assert_eq!(Ok(40), fs.seek(f, 0, 40, Whence::Set));
    assert_eq!(Ok(50), fs.seek(f, 40, 10, Whence::Cur));
    assert_eq!(Ok(30), fs.seek(f, 40, -10, Whence::Cur));
    assert_eq!(Ok(90), fs.seek(f, 0, -10, Whence::End));
    assert_eq!(Ok(100), fs.seek(f, 0, 0, Whence::End));

    assert_eq!(Err(IOError::InvalidArgument), fs.seek(f, 0, 101, Whence::Set));
    assert_eq!(Err(IOError::InvalidArgument), fs.seek(f, 0, -1, Whence::Set));
    assert_eq!(Err(IOError::InvalidArgument), fs.seek(f, 0, 1, Whence::End));
    assert_eq!(Err(IOError::InvalidArgument), fs.seek(f, 101, 0, Whence::Cur));
}

#[test]
pub fn write_type_checks() {
    let mut fs = default_fs();
    fs.symlink("/nowhere", "/s", ROOTINODE).unwrap();
    let s = fs.resolve(&yfs::parse_path("/s").unwrap(), ROOTINODE, yfs::Follow::NoFinal).unwrap();

    assert_eq!(Err(IOError::IsADirectory), fs.write(ROOTINODE, 0, b"x"));
    assert_eq!(Err(IOError::NotARegularFile), fs.write(s, 0, b"x"));
    assert_eq!(Err(IOError::NotFound), fs.open("/s", ROOTINODE));
}

#[test]
pub fn reading_a_directory_returns_raw_entries() {
    let mut fs = default_fs();
    let raw = fs.read(ROOTINODE, 0, 1000).unwrap();
    assert_eq!(2 * DIRENTRY_SIZE, raw.len());
    assert_eq!(b'.', raw[2]);
    assert_eq!(b"..", &raw[DIRENTRY_SIZE + 2..DIRENTRY_SIZE + 4]);
}

#[test]
pub fn running_out_of_inodes() {
    let mut fs = default_fs();
    let available = fs.free_inode_count();
    for i in 0..available {
        fs.create(&format!("/f{i}"), ROOTINODE).unwrap();
    }
    assert_eq!(Err(IOError::NoSpace), fs.create("/one-too-many", ROOTINODE));
    assert_eq!(Err(IOError::NoSpace), fs.mkdir("/dir", ROOTINODE));

    fs.unlink("/f0", ROOTINODE).unwrap();
    fs.create("/again", ROOTINODE).unwrap();
}
