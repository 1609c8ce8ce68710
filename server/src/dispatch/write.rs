use io_error::IOError;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

use super::unsigned;

fn write_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    inode: u32,
    offset: i64,
    data: &[u8],
) -> Result<Reply, IOError> {
    let written = fs.write(inode, unsigned(offset)?, data)?;
    Ok(Reply::ok(written as i64))
}

pub fn write<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Write {
        inode,
        offset,
        data,
    } = request
    else {
        return super::unexpected(fs, request);
    };

    write_high_level(fs, *inode, *offset, data).into()
}
