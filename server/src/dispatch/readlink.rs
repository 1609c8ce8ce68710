use io_error::IOError;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

use super::unsigned;

fn readlink_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    cwd: u32,
    path: &str,
    len: i64,
) -> Result<Reply, IOError> {
    let len = usize::try_from(unsigned(len)?).map_err(|_| IOError::InvalidArgument)?;
    fs.readlink(path, cwd, len).map(Reply::bytes)
}

pub fn readlink<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::ReadLink { cwd, path, len } = request else {
        return super::unexpected(fs, request);
    };

    readlink_high_level(fs, *cwd, path, *len).into()
}
