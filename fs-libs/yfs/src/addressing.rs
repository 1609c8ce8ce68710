use io_error::IOResult;
use shared_fs::{BLOCKSIZE, Inode, MAX_FILE_BLOCKS, NUM_DIRECT};

use crate::{BlockDevice, Filesystem};

const fn non_zero(block: u32) -> Option<u32> {
    if block == 0 { None } else { Some(block) }
}

fn indirect_slot(n: usize) -> usize {
    (n - NUM_DIRECT) * size_of::<u32>()
}

impl<D: BlockDevice> Filesystem<D> {
    /// Maps logical block `n` of `inode` to a physical block.
    ///
    /// Blocks that lie entirely past the end of the data are only handed out
    /// when `allocate` is set; they come back zero-filled, and the indirect
    /// block is allocated the first time it is needed. The caller owns saving
    /// `inode`. Returns `None` past the largest addressable block or when
    /// nothing is mapped.
    pub fn nth_block(&mut self, inode: &mut Inode, n: usize, allocate: bool) -> IOResult<Option<u32>> {
        if n >= MAX_FILE_BLOCKS {
            return Ok(None);
        }

        let beyond = n * BLOCKSIZE >= inode.size as usize;
        if beyond && !allocate {
            return Ok(None);
        }

        if n < NUM_DIRECT {
            if beyond {
                inode.direct[n] = self.fresh_block(inode.direct[n])?;
            }
            return Ok(non_zero(inode.direct[n]));
        }

        if inode.indirect == 0 {
            if !beyond {
                return Ok(None);
            }
            inode.indirect = self.allocate_block()?;
        }

        let at = indirect_slot(n);
        let current = {
            let table = self.get_block(inode.indirect)?;
            u32::from_le_bytes([table[at], table[at + 1], table[at + 2], table[at + 3]])
        };
        if !beyond {
            return Ok(non_zero(current));
        }

        let block = self.fresh_block(current)?;
        self.get_block_mut(inode.indirect)?[at..at + 4].copy_from_slice(&block.to_le_bytes());
        Ok(Some(block))
    }

    /// A zeroed block for a slot that is about to hold data. A block already
    /// sitting in the slot past the end of the data is reused.
    fn fresh_block(&mut self, current: u32) -> IOResult<u32> {
        if current == 0 {
            return self.allocate_block();
        }
        self.zeroed_block(current)?;
        Ok(current)
    }
}
