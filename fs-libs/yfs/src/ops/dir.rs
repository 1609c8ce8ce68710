use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{InodeType, ROOTINODE};

use crate::{BlockDevice, Filesystem, Follow, parse_path};

impl<D: BlockDevice> Filesystem<D> {
    /// Removes an empty directory.
    pub fn rmdir(&mut self, path: &str, cwd: u32) -> IOResult<()> {
        let parsed = parse_path(path)?;
        match parsed.split_last() {
            None | Some((_, "." | "..")) => return Err(IOError::Busy),
            Some(_) => {}
        }

        let (parent, name) = self.split_parent(path, cwd)?;
        let slot = self
            .find_entry(parent, &name, false)?
            .ok_or(IOError::NotFound)?;
        let inum = u32::from(slot.entry.inum);
        let mut inode = self.live_inode(inum)?;
        if inode.kind != InodeType::Directory {
            return Err(IOError::NotADirectory);
        }
        if inum == ROOTINODE {
            return Err(IOError::Busy);
        }

        let busy = self
            .live_entries(inum)?
            .iter()
            .any(|entry| !entry.matches(b".") && !entry.matches(b".."));
        if busy {
            return Err(IOError::DirectoryNotEmpty);
        }

        self.truncate(&mut inode)?;
        self.save_inode(inum, &inode)?;
        self.release_inode(inum)?;
        self.write_entry(&slot, &shared_fs::DirEntry::EMPTY)?;
        debug!("rmdir({path}) freed {inum}");
        Ok(())
    }

    /// Lists the live entries of a directory as `(name, inode)` pairs.
    pub fn read_dir(&mut self, path: &str, cwd: u32) -> IOResult<Vec<(String, u32)>> {
        let dir = self.resolve(&parse_path(path)?, cwd, Follow::Final)?;
        Ok(self
            .live_entries(dir)?
            .iter()
            .map(|entry| (entry.name().into_owned(), u32::from(entry.inum)))
            .collect())
    }
}
