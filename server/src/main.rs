use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use yfs::{
    FileDisk, Filesystem, FsConfig,
    config::{BLOCK_CACHESIZE, INODE_CACHESIZE},
};
use yfs_server::{Dispatcher, UnixTransport, logger, serve};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Socket clients connect to
    #[arg(env = "YFS_SOCKET", long, default_value = "yfs.sock")]
    socket: PathBuf,
    #[arg(env = "YFS_BLOCK_CACHE", long, default_value_t = BLOCK_CACHESIZE)]
    block_cache: usize,
    #[arg(env = "YFS_INODE_CACHE", long, default_value_t = INODE_CACHESIZE)]
    inode_cache: usize,
    #[arg(env = "YFS_LOG", long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// Log one JSON object per line
    #[arg(long)]
    log_json: bool,
    /// Formatted disk image
    disk: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level, args.log_json).context("installing the logger")?;

    let disk = FileDisk::open(&args.disk)
        .with_context(|| format!("opening {}", args.disk.display()))?;
    let config = FsConfig {
        block_cache_size: args.block_cache,
        inode_cache_size: args.inode_cache,
    };
    let fs = Filesystem::mount(disk, config)
        .with_context(|| format!("mounting {}", args.disk.display()))?;

    let mut transport = UnixTransport::bind(&args.socket)
        .with_context(|| format!("binding {}", args.socket.display()))?;
    let mut dispatcher = Dispatcher::new(fs);
    serve(&mut dispatcher, &mut transport).context("serving requests")?;

    dispatcher
        .into_filesystem()
        .disk()
        .sync_all()
        .context("flushing the disk image")?;
    Ok(())
}
