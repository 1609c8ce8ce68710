use log::debug;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn mkdir<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::MkDir { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.mkdir(path, *cwd)
        .inspect(|inum| debug!("Made directory {path} as {inum}"))
        .map(|_| Reply::ok(0))
        .into()
}
