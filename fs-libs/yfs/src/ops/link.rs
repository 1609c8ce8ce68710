use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{DirEntry, InodeType, MAXPATHNAMELEN};

use super::create::entry_inum;
use crate::{BlockDevice, Filesystem, Follow, parse_path};

impl<D: BlockDevice> Filesystem<D> {
    /// Adds `new` as another name for the file at `old`.
    pub fn link(&mut self, old: &str, new: &str, cwd: u32) -> IOResult<()> {
        let inum = self.resolve(&parse_path(old)?, cwd, Follow::Final)?;
        let mut inode = self.live_inode(inum)?;
        if inode.kind == InodeType::Directory {
            return Err(IOError::IsADirectory);
        }

        let (dir, name) = self.split_parent(new, cwd)?;
        let entry = DirEntry::new(entry_inum(inum)?, &name)?;
        let slot = self.find_entry(dir, &name, true)?.ok_or(IOError::NotFound)?;
        if !slot.entry.is_free() {
            return Err(IOError::AlreadyExists);
        }

        inode.nlink = inode.nlink.checked_add(1).ok_or(IOError::NoSpace)?;
        self.write_entry(&slot, &entry)?;
        self.save_inode(inum, &inode)?;
        debug!("link({old}, {new}): {inum} has {} links", inode.nlink);
        Ok(())
    }

    /// Removes a name. The file goes away with its last name.
    pub fn unlink(&mut self, path: &str, cwd: u32) -> IOResult<()> {
        let (dir, name) = self.split_parent(path, cwd)?;
        let slot = self.find_entry(dir, &name, false)?.ok_or(IOError::NotFound)?;
        let inum = u32::from(slot.entry.inum);
        let mut inode = self.live_inode(inum)?;
        if inode.kind == InodeType::Directory {
            return Err(IOError::IsADirectory);
        }

        self.write_entry(&slot, &DirEntry::EMPTY)?;
        inode.nlink = inode.nlink.saturating_sub(1);
        if inode.nlink == 0 {
            self.truncate(&mut inode)?;
            self.save_inode(inum, &inode)?;
            self.release_inode(inum)?;
        } else {
            self.save_inode(inum, &inode)?;
        }
        debug!("unlink({path}): {inum} has {} links", inode.nlink);
        Ok(())
    }

    /// Creates a symbolic link at `path` pointing at `target`. The target is
    /// stored as given and only interpreted when the link is followed.
    pub fn symlink(&mut self, target: &str, path: &str, cwd: u32) -> IOResult<()> {
        if target.is_empty() || target.len() >= MAXPATHNAMELEN || target.contains('\0') {
            return Err(IOError::InvalidArgument);
        }

        let (dir, name) = self.split_parent(path, cwd)?;
        DirEntry::new(0, &name)?;
        let slot = self.find_entry(dir, &name, true)?.ok_or(IOError::NotFound)?;
        if !slot.entry.is_free() {
            return Err(IOError::AlreadyExists);
        }

        let (inum, mut inode) = self.allocate_inode(InodeType::Symlink)?;
        let block = match self.nth_block(&mut inode, 0, true) {
            Ok(Some(block)) => block,
            result => {
                self.release_inode(inum)?;
                return Err(result.err().unwrap_or(IOError::NoSpace));
            }
        };

        self.get_block_mut(block)?[..target.len()].copy_from_slice(target.as_bytes());
        inode.size = target.len() as u32;
        self.save_inode(inum, &inode)?;
        self.write_entry(&slot, &DirEntry::new(entry_inum(inum)?, &name)?)?;
        debug!("symlink({target}, {path}) = {inum}");
        Ok(())
    }

    /// Returns at most `len` bytes of a symbolic link's target.
    pub fn readlink(&mut self, path: &str, cwd: u32, len: usize) -> IOResult<Vec<u8>> {
        let inum = self.resolve(&parse_path(path)?, cwd, Follow::NoFinal)?;
        let inode = self.live_inode(inum)?;
        if inode.kind != InodeType::Symlink {
            return Err(IOError::NotASymlink);
        }

        let mut target = self.read(inum, 0, inode.size as usize)?;
        let end = target
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(target.len())
            .min(len);
        target.truncate(end);
        Ok(target)
    }
}
