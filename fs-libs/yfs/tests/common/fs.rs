use shared_fs::NUMSECTORS;
use yfs::{DEFAULT_NUM_INODES, Filesystem, FsConfig, MemDisk, format};

pub fn fresh_disk() -> MemDisk {
    let mut disk = MemDisk::new(NUMSECTORS);
    format(&mut disk, DEFAULT_NUM_INODES).expect("A formattable disk");
    disk
}

pub fn mounted(config: FsConfig) -> Filesystem<MemDisk> {
    Filesystem::mount(fresh_disk(), config).expect("A mountable disk")
}

pub fn default_fs() -> Filesystem<MemDisk> {
    mounted(FsConfig::default())
}

/// Caches small enough that every operation evicts.
pub fn tiny_caches() -> FsConfig {
    FsConfig {
        block_cache_size: 2,
        inode_cache_size: 1,
    }
}

/// Caches large enough that nothing is ever evicted.
pub fn huge_caches() -> FsConfig {
    FsConfig {
        block_cache_size: NUMSECTORS as usize,
        inode_cache_size: DEFAULT_NUM_INODES as usize,
    }
}

pub fn remount(mut fs: Filesystem<MemDisk>, config: FsConfig) -> Filesystem<MemDisk> {
    fs.sync().expect("A clean sync");
    Filesystem::mount(fs.into_disk(), config).expect("A remountable disk")
}

/// Deterministic, non-repeating test data.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + i / 251) as u8).collect()
}
