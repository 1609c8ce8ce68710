use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

/// Replies with the inode of the new working directory; the client keeps it.
pub fn chdir<D: BlockDevice>(fs: &mut Filesystem<D>, request: &Request) -> Reply {
    let Request::ChDir { cwd, path } = request else {
        return super::unexpected(fs, request);
    };

    fs.chdir(path, *cwd).map(|inum| Reply::ok(inum.into())).into()
}
