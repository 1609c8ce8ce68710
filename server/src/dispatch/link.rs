use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn link<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Link { cwd, old, new } = request else {
        return super::unexpected(fs, request);
    };

    fs.link(old, new, *cwd).map(|()| Reply::ok(0)).into()
}
