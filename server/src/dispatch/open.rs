use io_error::IOError;
use log::debug;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

fn open_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    cwd: u32,
    path: &str,
) -> Result<Reply, IOError> {
    debug!("Opening: {path}");
    let inum = fs.open(path, cwd)?;
    Ok(Reply::ok(inum.into()))
}

pub fn open<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Open { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    open_high_level(fs, *cwd, path).into()
}
