use io_error::IOResult;
use log::{debug, info};

use crate::{BlockDevice, Filesystem};

impl<D: BlockDevice> Filesystem<D> {
    /// Writes every dirty inode into its block, then every dirty block to
    /// disk. Afterwards both caches are clean.
    pub fn sync(&mut self) -> IOResult<()> {
        let inodes = self.flush_inodes()?;
        let blocks = self.flush_blocks()?;
        debug!("sync: {inodes} inodes, {blocks} blocks written");
        Ok(())
    }

    pub fn shutdown(&mut self) -> IOResult<()> {
        self.sync()?;
        info!(
            free_blocks = self.free_block_count(),
            free_inodes = self.free_inode_count();
            "Filesystem shut down"
        );
        Ok(())
    }
}
