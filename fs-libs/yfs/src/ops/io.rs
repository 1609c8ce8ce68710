use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{BLOCKSIZE, Inode, InodeType, MAX_FILE_BLOCKS, Whence};

use crate::{BlockDevice, Filesystem};

impl<D: BlockDevice> Filesystem<D> {
    /// Reads up to `len` bytes starting at `offset`. Reading at the end of
    /// the data returns nothing; starting past it is an error.
    pub fn read(&mut self, inum: u32, offset: u64, len: usize) -> IOResult<Vec<u8>> {
        let mut inode = self.live_inode(inum)?;
        let size = u64::from(inode.size);
        if offset > size {
            return Err(IOError::InvalidArgument);
        }

        let len = len.min((size - offset) as usize);
        let mut out = Vec::with_capacity(len);
        let mut pos = offset as usize;
        while out.len() < len {
            let within = pos % BLOCKSIZE;
            let chunk = (BLOCKSIZE - within).min(len - out.len());
            let block = self
                .nth_block(&mut inode, pos / BLOCKSIZE, false)?
                .ok_or(IOError::Corrupted)?;
            out.extend_from_slice(&self.get_block(block)?[within..within + chunk]);
            pos += chunk;
        }

        debug!("read({inum}, {offset}, {len}) = {}", out.len());
        Ok(out)
    }

    /// Writes `data` at `offset` of a regular file, growing it as needed.
    /// A gap between the old end and `offset` reads back as zeroes.
    pub fn write(&mut self, inum: u32, offset: u64, data: &[u8]) -> IOResult<usize> {
        let mut inode = self.live_inode(inum)?;
        match inode.kind {
            InodeType::Regular => {}
            InodeType::Directory => return Err(IOError::IsADirectory),
            _ => return Err(IOError::NotARegularFile),
        }

        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(IOError::InvalidArgument)?;
        if end > (MAX_FILE_BLOCKS * BLOCKSIZE) as u64 {
            return Err(IOError::NoSpace);
        }
        if data.is_empty() {
            return Ok(0);
        }

        // Blocks already attached stay attached on failure, so the inode is
        // saved either way.
        let written = self.write_blocks(&mut inode, offset as usize, data);
        self.save_inode(inum, &inode)?;
        let written = written?;

        debug!("write({inum}, {offset}, {}) = {written}", data.len());
        Ok(written)
    }

    fn write_blocks(&mut self, inode: &mut Inode, offset: usize, data: &[u8]) -> IOResult<usize> {
        for n in inode.block_count()..offset / BLOCKSIZE {
            self.nth_block(inode, n, true)?.ok_or(IOError::NoSpace)?;
        }

        let mut written = 0;
        while written < data.len() {
            let pos = offset + written;
            let within = pos % BLOCKSIZE;
            let chunk = (BLOCKSIZE - within).min(data.len() - written);
            let block = self
                .nth_block(inode, pos / BLOCKSIZE, true)?
                .ok_or(IOError::NoSpace)?;
            self.get_block_mut(block)?[within..within + chunk]
                .copy_from_slice(&data[written..written + chunk]);

            written += chunk;
            inode.size = inode.size.max((pos + chunk) as u32);
        }
        Ok(written)
    }

    /// Computes a new file position. The result must stay within the data.
    pub fn seek(&mut self, inum: u32, position: i64, offset: i64, whence: Whence) -> IOResult<u64> {
        let size = i64::from(self.live_inode(inum)?.size);
        if !(0..=size).contains(&position) {
            return Err(IOError::InvalidArgument);
        }

        let base = match whence {
            Whence::Set => 0,
            Whence::Cur => position,
            Whence::End => size,
        };
        base.checked_add(offset)
            .filter(|target| (0..=size).contains(target))
            .map(|target| target as u64)
            .ok_or(IOError::InvalidArgument)
    }
}
