use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn rmdir<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::RmDir { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.rmdir(path, *cwd).map(|()| Reply::ok(0)).into()
}
