use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{DIRENTRY_SIZE, DirEntry, InodeType};

use crate::{BlockDevice, Filesystem};

/// Narrows an inode number to the width stored in directory entries.
pub(crate) fn entry_inum(inum: u32) -> IOResult<u16> {
    u16::try_from(inum).map_err(|_| IOError::Corrupted)
}

impl<D: BlockDevice> Filesystem<D> {
    /// Creates a regular file, or empties it if it already exists.
    pub fn create(&mut self, path: &str, cwd: u32) -> IOResult<u32> {
        let (dir, name) = self.split_parent(path, cwd)?;
        DirEntry::new(0, &name)?;

        let slot = self
            .find_entry(dir, &name, true)?
            .ok_or(IOError::NotFound)?;

        if !slot.entry.is_free() {
            let inum = u32::from(slot.entry.inum);
            let mut inode = self.live_inode(inum)?;
            match inode.kind {
                InodeType::Directory => return Err(IOError::IsADirectory),
                InodeType::Symlink => return Err(IOError::NotARegularFile),
                InodeType::Regular | InodeType::Free => {}
            }
            self.truncate(&mut inode)?;
            self.save_inode(inum, &inode)?;
            debug!("create({path}) truncated {inum}");
            return Ok(inum);
        }

        let (inum, _) = self.allocate_inode(InodeType::Regular)?;
        self.write_entry(&slot, &DirEntry::new(entry_inum(inum)?, &name)?)?;
        debug!("create({path}) = {inum}");
        Ok(inum)
    }

    /// Creates an empty directory holding `.` and `..`.
    pub fn mkdir(&mut self, path: &str, cwd: u32) -> IOResult<u32> {
        let (parent, name) = self.split_parent(path, cwd)?;
        DirEntry::new(0, &name)?;

        let slot = self
            .find_entry(parent, &name, true)?
            .ok_or(IOError::NotFound)?;
        if !slot.entry.is_free() {
            return Err(IOError::AlreadyExists);
        }

        let (inum, mut inode) = self.allocate_inode(InodeType::Directory)?;
        let block = match self.nth_block(&mut inode, 0, true) {
            Ok(Some(block)) => block,
            result => {
                self.release_inode(inum)?;
                return Err(result.err().unwrap_or(IOError::NoSpace));
            }
        };

        let data = self.get_block_mut(block)?;
        DirEntry::new(entry_inum(inum)?, ".")?.encode(&mut data[..DIRENTRY_SIZE]);
        DirEntry::new(entry_inum(parent)?, "..")?
            .encode(&mut data[DIRENTRY_SIZE..2 * DIRENTRY_SIZE]);

        inode.size = 2 * DIRENTRY_SIZE as u32;
        self.save_inode(inum, &inode)?;
        self.write_entry(&slot, &DirEntry::new(entry_inum(inum)?, &name)?)?;
        debug!("mkdir({path}) = {inum}");
        Ok(inum)
    }
}
