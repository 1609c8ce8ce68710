use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn unlink<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Unlink { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.unlink(path, *cwd).map(|()| Reply::ok(0)).into()
}
