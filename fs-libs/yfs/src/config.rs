use io_error::{IOError, IOResult};

pub const BLOCK_CACHESIZE: usize = 32;
pub const INODE_CACHESIZE: usize = 16;

/// Mount-time tuning of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    pub block_cache_size: usize,
    pub inode_cache_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            block_cache_size: BLOCK_CACHESIZE,
            inode_cache_size: INODE_CACHESIZE,
        }
    }
}

impl FsConfig {
    pub fn validate(&self) -> IOResult<()> {
        if self.block_cache_size == 0 || self.inode_cache_size == 0 {
            return Err(IOError::InvalidArgument);
        }
        Ok(())
    }
}
