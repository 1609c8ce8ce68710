use io_error::{IOError, IOResult};
use log::{debug, trace, warn};
use shared_fs::{Inode, InodeType, ROOTINODE};

use crate::{BlockDevice, Filesystem};

impl<D: BlockDevice> Filesystem<D> {
    /// Scans every inode, marking the blocks reachable from the ones in use.
    /// Free inodes and unmarked blocks become the free lists, with the lowest
    /// numbers on top.
    pub(crate) fn build_free_lists(&mut self) -> IOResult<()> {
        let num_blocks = self.header.num_blocks as usize;
        let mut taken = vec![false; num_blocks];
        // boot block, header and inode table
        let reserved = (self.header.first_data_block() as usize).min(num_blocks);
        taken[..reserved].fill(true);

        let mut free_inodes = Vec::new();
        for inum in ROOTINODE..=self.header.num_inodes {
            let inode = self.get_inode(inum)?;
            if inode.is_free() {
                free_inodes.push(inum);
                continue;
            }

            for block in self.blocks_of(&inode)? {
                match taken.get_mut(block as usize) {
                    Some(slot) if !*slot => *slot = true,
                    Some(_) => {
                        warn!("Block {block} of inode {inum} is referenced twice");
                        return Err(IOError::Corrupted);
                    }
                    None => return Err(IOError::Corrupted),
                }
            }
        }

        self.free_inodes = free_inodes.into_iter().rev().collect();
        self.free_blocks = (0..num_blocks)
            .rev()
            .filter(|&n| !taken[n])
            .map(|n| n as u32)
            .collect();
        Ok(())
    }

    /// Every block an inode holds: its data blocks and its indirect block.
    pub(crate) fn blocks_of(&mut self, inode: &Inode) -> IOResult<Vec<u32>> {
        let mut blocks: Vec<u32> = inode.direct.iter().copied().filter(|&b| b != 0).collect();
        if inode.indirect != 0 {
            let indirect = *self.get_block(inode.indirect)?;
            blocks.extend(
                indirect
                    .chunks_exact(4)
                    .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .filter(|&b| b != 0),
            );
            blocks.push(inode.indirect);
        }
        Ok(blocks)
    }

    /// Like [`blocks_of`](Self::blocks_of), looked up by inode number.
    pub fn inode_blocks(&mut self, inum: u32) -> IOResult<Vec<u32>> {
        let inode = self.get_inode(inum)?;
        self.blocks_of(&inode)
    }

    pub fn free_inode_count(&self) -> usize {
        self.free_inodes.len()
    }

    pub fn free_block_count(&self) -> usize {
        self.free_blocks.len()
    }

    pub fn free_blocks(&self) -> impl Iterator<Item = u32> + '_ {
        self.free_blocks.iter().rev().copied()
    }

    /// Pops the next free inode and bumps its generation counter.
    pub fn next_free_inode(&mut self) -> IOResult<Option<u32>> {
        let Some(inum) = self.free_inodes.pop() else {
            return Ok(None);
        };
        let mut inode = self.get_inode(inum)?;
        if !inode.is_free() {
            warn!("Inode {inum} on the free list is in use");
            return Err(IOError::Corrupted);
        }
        inode.reuse = inode.reuse.wrapping_add(1);
        self.save_inode(inum, &inode)?;
        Ok(Some(inum))
    }

    pub fn next_free_block(&mut self) -> Option<u32> {
        self.free_blocks.pop()
    }

    /// Allocates an inode of the given type with one link and no data.
    pub(crate) fn allocate_inode(&mut self, kind: InodeType) -> IOResult<(u32, Inode)> {
        let inum = self.next_free_inode()?.ok_or_else(|| {
            warn!("Out of free inodes");
            IOError::NoSpace
        })?;
        let inode = Inode::new(kind, self.get_inode(inum)?.reuse);
        self.save_inode(inum, &inode)?;
        debug!("Allocated inode {inum} as {kind:?}");
        Ok((inum, inode))
    }

    /// Allocates a block and installs it zero-filled in the cache.
    pub(crate) fn allocate_block(&mut self) -> IOResult<u32> {
        let block = self.next_free_block().ok_or_else(|| {
            warn!("Out of free blocks");
            IOError::NoSpace
        })?;
        self.zeroed_block(block)?;
        trace!("Allocated block {block}");
        Ok(block)
    }

    /// Marks an inode free and puts it back on top of the free list.
    pub fn release_inode(&mut self, inum: u32) -> IOResult<()> {
        let reuse = self.get_inode(inum)?.reuse;
        let mut inode = Inode::new(InodeType::Free, reuse);
        inode.nlink = 0;
        self.save_inode(inum, &inode)?;
        self.free_inodes.push(inum);
        debug!("Released inode {inum}");
        Ok(())
    }

    pub fn release_block(&mut self, block: u32) {
        self.discard_block(block);
        self.free_blocks.push(block);
        trace!("Released block {block}");
    }

    /// Returns every block of an inode to the free list and empties it.
    pub(crate) fn truncate(&mut self, inode: &mut Inode) -> IOResult<()> {
        for block in self.blocks_of(inode)? {
            self.release_block(block);
        }
        inode.direct = [0; shared_fs::NUM_DIRECT];
        inode.indirect = 0;
        inode.size = 0;
        Ok(())
    }
}
