use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn stat<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::Stat { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.stat(path, *cwd).map(Reply::stat).into()
}
