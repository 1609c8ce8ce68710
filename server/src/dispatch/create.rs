use io_error::IOError;
use log::debug;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

fn create_high_level<D: BlockDevice>(
    fs: &mut Filesystem<D>,
    cwd: u32,
    path: &str,
) -> Result<Reply, IOError> {
    let inum = fs.create(path, cwd)?;
    debug!("Created {path} as {inum}");
    Ok(Reply::ok(inum.into()))
}

pub fn create<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Create { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    create_high_level(fs, *cwd, path).into()
}
