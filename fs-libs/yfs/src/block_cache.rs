use std::io;

use io_error::{IOError, IOResult};
use log::{error, trace};
use shared_fs::{BLOCKSIZE, Block};
use yfs_utils::lru::CacheEntry;

use crate::{BlockDevice, Filesystem};

pub(crate) fn disk_error(op: &str, block: u32, e: &io::Error) -> IOError {
    error!("Disk {op} of block {block} failed: {e}");
    IOError::DiskFailure
}

impl<D: BlockDevice> Filesystem<D> {
    fn check_block(&self, n: u32) -> IOResult<()> {
        if n >= self.header.num_blocks {
            error!("Block number {n} is outside the filesystem");
            return Err(IOError::Corrupted);
        }
        Ok(())
    }

    /// Evicts the least recently used block if the cache is full, writing it
    /// back first when dirty.
    fn make_room_for_block(&mut self) -> IOResult<()> {
        if !self.blocks.is_full() {
            return Ok(());
        }
        if let Some((n, entry)) = self.blocks.pop_lru() {
            trace!("Evicting block {n} (dirty: {})", entry.dirty);
            if entry.dirty {
                self.disk
                    .write_block(n, &entry.value)
                    .map_err(|e| disk_error("write", n, &e))?;
            }
        }
        Ok(())
    }

    fn block_entry(&mut self, n: u32) -> IOResult<&mut CacheEntry<Box<Block>>> {
        self.check_block(n)?;
        if self.blocks.contains(&n) {
            return self.blocks.get(&n).ok_or(IOError::Corrupted);
        }

        self.make_room_for_block()?;
        trace!("Block cache miss: {n}");
        let mut buf = Box::new([0; BLOCKSIZE]);
        self.disk
            .read_block(n, &mut buf)
            .map_err(|e| disk_error("read", n, &e))?;
        Ok(self.blocks.insert(n, buf))
    }

    pub fn get_block(&mut self, n: u32) -> IOResult<&Block> {
        let entry = self.block_entry(n)?;
        Ok(&*entry.value)
    }

    /// Fetches a block for modification; the block is marked dirty.
    pub fn get_block_mut(&mut self, n: u32) -> IOResult<&mut Block> {
        let entry = self.block_entry(n)?;
        entry.dirty = true;
        Ok(&mut *entry.value)
    }

    /// Marks a cached block dirty. Blocks that are not resident have nothing
    /// to save.
    pub fn save_block(&mut self, n: u32) {
        match self.blocks.peek_mut(&n) {
            Some(entry) => entry.dirty = true,
            None => trace!("save_block({n}) on a block that is not cached"),
        }
    }

    /// Installs an all-zero dirty buffer for block `n` without reading it.
    pub fn zeroed_block(&mut self, n: u32) -> IOResult<&mut Block> {
        self.check_block(n)?;
        if !self.blocks.contains(&n) {
            self.make_room_for_block()?;
        }
        let entry = self.blocks.insert(n, Box::new([0; BLOCKSIZE]));
        entry.dirty = true;
        Ok(&mut *entry.value)
    }

    /// Drops a block from the cache without writing it back.
    pub(crate) fn discard_block(&mut self, n: u32) {
        self.blocks.remove(&n);
    }

    pub(crate) fn flush_blocks(&mut self) -> IOResult<usize> {
        let dirty = self.blocks.dirty_keys();
        for &n in &dirty {
            if let Some(entry) = self.blocks.peek_mut(&n) {
                self.disk
                    .write_block(n, &entry.value)
                    .map_err(|e| disk_error("write", n, &e))?;
                entry.dirty = false;
            }
        }
        Ok(dirty.len())
    }
}

#[cfg(test)]
mod tests {
    use shared_fs::NUMSECTORS;

    use crate::{DEFAULT_NUM_INODES, Filesystem, FsConfig, MemDisk, format};

    fn mounted(block_cache_size: usize) -> Filesystem<MemDisk> {
        let mut disk = MemDisk::new(NUMSECTORS);
        format(&mut disk, DEFAULT_NUM_INODES).unwrap();
        Filesystem::mount(
            disk,
            FsConfig {
                block_cache_size,
                inode_cache_size: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn hits_do_not_reach_the_disk() {
        let mut fs = mounted(8);
        fs.get_block(100).unwrap();
        let reads = fs.disk().reads();
        fs.get_block(100).unwrap();
        fs.get_block(100).unwrap();
        assert_eq!(reads, fs.disk().reads());
    }

    #[test]
    fn dirty_eviction_writes_back() {
        let mut fs = mounted(2);
        fs.get_block_mut(200).unwrap()[0] = 0xaa;
        fs.disk_mut().reset_counters();

        fs.get_block(201).unwrap();
        assert_eq!(0, fs.disk().writes());
        fs.get_block(202).unwrap();
        assert_eq!(1, fs.disk().writes());
        assert_eq!(0xaa, fs.disk().raw(200).unwrap()[0]);

        assert_eq!(0xaa, fs.get_block(200).unwrap()[0]);
    }

    #[test]
    fn clean_eviction_is_silent() {
        let mut fs = mounted(2);
        fs.disk_mut().reset_counters();
        for n in 300..310 {
            fs.get_block(n).unwrap();
        }
        assert_eq!(0, fs.disk().writes());
        assert_eq!(10, fs.disk().reads());
    }

    #[test]
    fn save_block_marks_dirty() {
        let mut fs = mounted(4);
        fs.get_block(400).unwrap();
        let before = fs.cache_stats().dirty_blocks;
        fs.save_block(400);
        assert_eq!(before + 1, fs.cache_stats().dirty_blocks);
    }

    #[test]
    fn zeroed_block_skips_the_read() {
        let mut fs = mounted(4);
        fs.disk_mut().reset_counters();
        fs.zeroed_block(500).unwrap()[3] = 1;
        assert_eq!(0, fs.disk().reads());
        assert_eq!(1, fs.get_block(500).unwrap()[3]);
    }

    #[test]
    fn out_of_range_blocks_are_corrupt() {
        let mut fs = mounted(4);
        assert_eq!(
            Err(io_error::IOError::Corrupted),
            fs.get_block(NUMSECTORS).map(|_| ())
        );
    }
}
