use io_error::{IOError, IOResult};
use log::trace;
use shared_fs::{INODESIZE, Inode, inode::inode_location};
use yfs_utils::lru::CacheEntry;

use crate::{BlockDevice, Filesystem};

impl<D: BlockDevice> Filesystem<D> {
    pub(crate) fn check_inum(&self, inum: u32) -> IOResult<()> {
        if inum == 0 || inum > self.header.num_inodes {
            return Err(IOError::InvalidArgument);
        }
        Ok(())
    }

    /// Copies an inode into its slot of the cached inode table block.
    fn write_inode_to_block(&mut self, inum: u32, inode: &Inode) -> IOResult<()> {
        let (block, offset) = inode_location(inum);
        inode.encode(&mut self.get_block_mut(block)?[offset..offset + INODESIZE]);
        Ok(())
    }

    /// Evicts the least recently used inode if the cache is full. A dirty
    /// inode goes back into its block buffer, not straight to disk.
    fn make_room_for_inode(&mut self) -> IOResult<()> {
        if !self.inodes.is_full() {
            return Ok(());
        }
        if let Some((inum, entry)) = self.inodes.pop_lru() {
            trace!("Evicting inode {inum} (dirty: {})", entry.dirty);
            if entry.dirty {
                self.write_inode_to_block(inum, &entry.value)?;
            }
        }
        Ok(())
    }

    fn inode_entry(&mut self, inum: u32) -> IOResult<&mut CacheEntry<Inode>> {
        self.check_inum(inum)?;
        if self.inodes.contains(&inum) {
            return self.inodes.get(&inum).ok_or(IOError::Corrupted);
        }

        trace!("Inode cache miss: {inum}");
        let (block, offset) = inode_location(inum);
        let inode = Inode::decode(&self.get_block(block)?[offset..offset + INODESIZE])?;
        self.make_room_for_inode()?;
        Ok(self.inodes.insert(inum, inode))
    }

    /// Returns a copy of inode `inum`.
    pub fn get_inode(&mut self, inum: u32) -> IOResult<Inode> {
        Ok(self.inode_entry(inum)?.value)
    }

    /// Stores `inode` as the current value of `inum` and marks it dirty.
    pub fn save_inode(&mut self, inum: u32, inode: &Inode) -> IOResult<()> {
        self.check_inum(inum)?;
        if !self.inodes.contains(&inum) {
            self.make_room_for_inode()?;
        }
        let entry = self.inodes.insert(inum, *inode);
        entry.dirty = true;
        Ok(())
    }

    /// An inode that is in use, or `NotFound` for a free one.
    pub(crate) fn live_inode(&mut self, inum: u32) -> IOResult<Inode> {
        let inode = self.get_inode(inum)?;
        if inode.is_free() {
            return Err(IOError::NotFound);
        }
        Ok(inode)
    }

    pub(crate) fn flush_inodes(&mut self) -> IOResult<usize> {
        let dirty = self.inodes.dirty_keys();
        for &inum in &dirty {
            let Some(inode) = self.inodes.peek(&inum).map(|entry| entry.value) else {
                continue;
            };
            self.write_inode_to_block(inum, &inode)?;
            if let Some(entry) = self.inodes.peek_mut(&inum) {
                entry.dirty = false;
            }
        }
        Ok(dirty.len())
    }
}

#[cfg(test)]
mod tests {
    use shared_fs::{InodeType, NUMSECTORS, ROOTINODE};

    use crate::{DEFAULT_NUM_INODES, Filesystem, FsConfig, MemDisk, format};

    fn mounted(inode_cache_size: usize) -> Filesystem<MemDisk> {
        let mut disk = MemDisk::new(NUMSECTORS);
        format(&mut disk, DEFAULT_NUM_INODES).unwrap();
        Filesystem::mount(
            disk,
            FsConfig {
                block_cache_size: 16,
                inode_cache_size,
            },
        )
        .unwrap()
    }

    #[test]
    fn root_is_a_directory() {
        let mut fs = mounted(4);
        let root = fs.get_inode(ROOTINODE).unwrap();
        assert_eq!(InodeType::Directory, root.kind);
        assert_eq!(2, root.nlink);
    }

    #[test]
    fn evicted_inode_lands_in_its_block() {
        let mut fs = mounted(2);
        let mut inode = fs.get_inode(5).unwrap();
        inode.reuse = 42;
        fs.save_inode(5, &inode).unwrap();

        fs.get_inode(6).unwrap();
        fs.get_inode(7).unwrap();
        assert_eq!(0, fs.cache_stats().dirty_inodes);
        assert_eq!(42, fs.get_inode(5).unwrap().reuse);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let mut fs = mounted(2);
        assert_eq!(Err(io_error::IOError::InvalidArgument), fs.get_inode(0));
        assert_eq!(
            Err(io_error::IOError::InvalidArgument),
            fs.get_inode(DEFAULT_NUM_INODES + 1)
        );
    }
}
