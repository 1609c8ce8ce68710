use io_error::IOError;
use log::debug;
use shared_fs::Whence;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

fn seek_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    inode: u32,
    position: i64,
    offset: i64,
    whence: Whence,
) -> Result<Reply, IOError> {
    let new = fs.seek(inode, position, offset, whence)?;
    debug!("Seek {inode}: {position} {whence:?} {offset} -> {new}");
    i64::try_from(new)
        .map(Reply::ok)
        .map_err(|_| IOError::InvalidArgument)
}

pub fn seek<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Seek {
        inode,
        position,
        offset,
        whence,
    } = request
    else {
        return super::unexpected(fs, request);
    };

    seek_high_level(fs, *inode, *position, *offset, *whence).into()
}
