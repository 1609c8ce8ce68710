use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn symlink<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::SymLink { cwd, target, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.symlink(target, path, *cwd).map(|()| Reply::ok(0)).into()
}
