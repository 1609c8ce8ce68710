use log::info;
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{Reply, Request};

pub fn shutdown<D: BlockDevice>(fs: &mut Filesystem<D>, _: &Request) -> Reply {
    info!("Shutdown requested");
    fs.shutdown().map(|()| Reply::ok(0)).into()
}
