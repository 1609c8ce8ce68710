//! The YFS filesystem engine.
//!
//! A [`Filesystem`] owns a block device together with the block cache, the
//! inode cache and the free inode and block lists. Every public operation
//! runs to completion before the next one starts; there is no internal
//! locking.

use io_error::{IOError, IOResult};
use log::{debug, info};
use shared_fs::{BLOCKSIZE, Block, FsHeader, Inode, InodeType, ROOTINODE};
use yfs_utils::lru::LruCache;

mod addressing;
mod block_cache;
pub mod config;
mod directory;
pub mod disk;
mod format;
mod freelist;
mod inode_cache;
mod ops;
mod resolve;

pub use config::FsConfig;
pub use directory::DirSlot;
pub use disk::{BlockDevice, FileDisk, MemDisk};
pub use format::{DEFAULT_NUM_INODES, format};
pub use resolve::{Follow, SymlinkBudget, parse_path};

/// Occupancy of both caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub blocks: usize,
    pub dirty_blocks: usize,
    pub inodes: usize,
    pub dirty_inodes: usize,
}

pub struct Filesystem<D> {
    disk: D,
    header: FsHeader,
    blocks: LruCache<u32, Box<Block>>,
    inodes: LruCache<u32, Inode>,
    free_inodes: Vec<u32>,
    free_blocks: Vec<u32>,
}

impl<D: BlockDevice> Filesystem<D> {
    /// Reads the header of a formatted disk and rebuilds the free lists by
    /// scanning every inode.
    pub fn mount(mut disk: D, config: FsConfig) -> IOResult<Self> {
        config.validate()?;

        let mut raw = [0; BLOCKSIZE];
        disk.read_block(1, &mut raw)
            .map_err(|e| block_cache::disk_error("read", 1, &e))?;
        let header = FsHeader::decode(&raw);
        check_header(&header, disk.num_blocks())?;
        debug!("Header: {header:?}");

        let mut fs = Self {
            disk,
            header,
            blocks: LruCache::new(config.block_cache_size),
            inodes: LruCache::new(config.inode_cache_size),
            free_inodes: Vec::new(),
            free_blocks: Vec::new(),
        };

        if fs.get_inode(ROOTINODE)?.kind != InodeType::Directory {
            return Err(IOError::Corrupted);
        }
        fs.build_free_lists()?;

        info!(
            num_blocks = header.num_blocks,
            num_inodes = header.num_inodes,
            free_blocks = fs.free_block_count(),
            free_inodes = fs.free_inode_count();
            "Mounted filesystem"
        );
        Ok(fs)
    }

    pub const fn header(&self) -> FsHeader {
        self.header
    }

    pub const fn disk(&self) -> &D {
        &self.disk
    }

    pub fn disk_mut(&mut self) -> &mut D {
        &mut self.disk
    }

    /// Gives the device back without flushing anything.
    pub fn into_disk(self) -> D {
        self.disk
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            blocks: self.blocks.len(),
            dirty_blocks: self.blocks.dirty_keys().len(),
            inodes: self.inodes.len(),
            dirty_inodes: self.inodes.dirty_keys().len(),
        }
    }
}

fn check_header(header: &FsHeader, device_blocks: u32) -> IOResult<()> {
    let valid = header.num_inodes >= ROOTINODE
        && header.num_inodes <= i16::MAX as u32
        && header.num_blocks <= device_blocks
        && header.first_data_block() < header.num_blocks;

    if valid {
        Ok(())
    } else {
        log::error!("Bad filesystem header {header:?} on a {device_blocks} block device");
        Err(IOError::Corrupted)
    }
}
