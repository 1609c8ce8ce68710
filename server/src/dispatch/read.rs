use io_error::IOError;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

use super::unsigned;

fn read_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    inode: u32,
    offset: i64,
    len: i64,
) -> Result<Reply, IOError> {
    let len = usize::try_from(unsigned(len)?).map_err(|_| IOError::InvalidArgument)?;
    let data = fs.read(inode, unsigned(offset)?, len)?;
    Ok(Reply::bytes(data))
}

pub fn read<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Read { inode, offset, len } = request else {
        return super::unexpected(fs, request);
    };

    read_high_level(fs, *inode, *offset, *len).into()
}
