use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{InodeType, Stat};

use crate::{BlockDevice, Filesystem, Follow, parse_path};

impl<D: BlockDevice> Filesystem<D> {
    pub fn open(&mut self, path: &str, cwd: u32) -> IOResult<u32> {
        let inum = self.resolve(&parse_path(path)?, cwd, Follow::Final)?;
        debug!("open({path}) = {inum}");
        Ok(inum)
    }

    /// Resolves a new working directory.
    pub fn chdir(&mut self, path: &str, cwd: u32) -> IOResult<u32> {
        let inum = self.resolve(&parse_path(path)?, cwd, Follow::Final)?;
        if self.live_inode(inum)?.kind != InodeType::Directory {
            return Err(IOError::NotADirectory);
        }
        Ok(inum)
    }

    pub fn stat(&mut self, path: &str, cwd: u32) -> IOResult<Stat> {
        let inum = self.resolve(&parse_path(path)?, cwd, Follow::Final)?;
        self.live_inode(inum)?.stat(inum).ok_or(IOError::NotFound)
    }
}
