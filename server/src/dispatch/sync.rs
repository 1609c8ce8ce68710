use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn sync<D: BlockDevice>(fs: &mut Filesystem<D>, _: &Request) -> Reply {
    fs.sync().map(|()| Reply::ok(0)).into()
}
