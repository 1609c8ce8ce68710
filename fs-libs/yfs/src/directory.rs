use io_error::{IOError, IOResult};
use log::trace;
use shared_fs::{
    BLOCKSIZE, DIRENTRIES_PER_BLOCK, DIRENTRY_SIZE, DirEntry, InodeType,
};

use crate::{BlockDevice, Filesystem};

/// Where a directory entry lives on disk, and what it held when found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirSlot {
    pub block: u32,
    pub offset: usize,
    pub entry: DirEntry,
}

impl<D: BlockDevice> Filesystem<D> {
    /// Looks `name` up in directory `dir`.
    ///
    /// With `create` set, a missing name yields a slot to fill in instead:
    /// the first free slot seen during the scan, or a new slot appended at the
    /// end of the directory (growing it by one entry, and by one block when
    /// the last block is full). The returned slot's entry is then free.
    pub fn find_entry(&mut self, dir: u32, name: &str, create: bool) -> IOResult<Option<DirSlot>> {
        let mut inode = self.live_inode(dir)?;
        if inode.kind != InodeType::Directory {
            return Err(IOError::NotADirectory);
        }
        if inode.size as usize % DIRENTRY_SIZE != 0 {
            return Err(IOError::Corrupted);
        }

        let count = inode.size as usize / DIRENTRY_SIZE;
        let mut free = None;
        for n in 0..inode.block_count() {
            let block = self
                .nth_block(&mut inode, n, false)?
                .ok_or(IOError::Corrupted)?;
            let here = (count - n * DIRENTRIES_PER_BLOCK).min(DIRENTRIES_PER_BLOCK);
            let data = self.get_block(block)?;

            for i in 0..here {
                let offset = i * DIRENTRY_SIZE;
                let entry = DirEntry::decode(&data[offset..offset + DIRENTRY_SIZE]);
                let slot = DirSlot {
                    block,
                    offset,
                    entry,
                };
                if entry.is_free() {
                    free.get_or_insert(slot);
                } else if entry.matches(name.as_bytes()) {
                    return Ok(Some(slot));
                }
            }
        }

        if !create {
            return Ok(None);
        }
        if let Some(slot) = free {
            trace!("Reusing slot {}:{} in directory {dir}", slot.block, slot.offset);
            return Ok(Some(slot));
        }

        let size = inode.size as usize;
        let n = size / BLOCKSIZE;
        let offset = size % BLOCKSIZE;
        let block = if offset == 0 {
            self.nth_block(&mut inode, n, true)?.ok_or(IOError::NoSpace)?
        } else {
            self.nth_block(&mut inode, n, false)?
                .ok_or(IOError::Corrupted)?
        };

        DirEntry::EMPTY.encode(&mut self.get_block_mut(block)?[offset..offset + DIRENTRY_SIZE]);
        inode.size += DIRENTRY_SIZE as u32;
        self.save_inode(dir, &inode)?;
        trace!("Appended slot {block}:{offset} to directory {dir}");

        Ok(Some(DirSlot {
            block,
            offset,
            entry: DirEntry::EMPTY,
        }))
    }

    pub fn write_entry(&mut self, slot: &DirSlot, entry: &DirEntry) -> IOResult<()> {
        entry.encode(&mut self.get_block_mut(slot.block)?[slot.offset..slot.offset + DIRENTRY_SIZE]);
        Ok(())
    }

    /// The live entries of directory `dir`, in slot order.
    pub(crate) fn live_entries(&mut self, dir: u32) -> IOResult<Vec<DirEntry>> {
        let mut inode = self.live_inode(dir)?;
        if inode.kind != InodeType::Directory {
            return Err(IOError::NotADirectory);
        }

        let count = inode.size as usize / DIRENTRY_SIZE;
        let mut entries = Vec::new();
        for n in 0..inode.block_count() {
            let block = self
                .nth_block(&mut inode, n, false)?
                .ok_or(IOError::Corrupted)?;
            let here = (count - n * DIRENTRIES_PER_BLOCK).min(DIRENTRIES_PER_BLOCK);
            let data = self.get_block(block)?;
            entries.extend(
                data.chunks_exact(DIRENTRY_SIZE)
                    .take(here)
                    .map(DirEntry::decode)
                    .filter(|entry| !entry.is_free()),
            );
        }
        Ok(entries)
    }
}
