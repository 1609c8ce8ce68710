//! Sector-addressed storage underneath the block cache.

use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::fs::FileExt,
    path::Path,
};

use shared_fs::{BLOCKSIZE, Block};

pub trait BlockDevice {
    fn num_blocks(&self) -> u32;
    fn read_block(&mut self, n: u32, buf: &mut Block) -> io::Result<()>;
    fn write_block(&mut self, n: u32, buf: &Block) -> io::Result<()>;
}

fn check_range(n: u32, num_blocks: u32) -> io::Result<()> {
    if n >= num_blocks {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("block {n} out of range (disk has {num_blocks})"),
        ));
    }
    Ok(())
}

/// A disk image file.
#[derive(Debug)]
pub struct FileDisk {
    file: File,
    num_blocks: u32,
}

impl FileDisk {
    /// Opens an existing image. Its size is rounded down to whole blocks.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let num_blocks = u32::try_from(file.metadata()?.len() / BLOCKSIZE as u64)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "disk image too large"))?;
        Ok(Self { file, num_blocks })
    }

    /// Creates (or truncates) an image of `num_blocks` zeroed blocks.
    pub fn create(path: impl AsRef<Path>, num_blocks: u32) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(u64::from(num_blocks) * BLOCKSIZE as u64)?;
        Ok(Self { file, num_blocks })
    }

    pub fn sync_all(&self) -> io::Result<()> {
        self.file.sync_all()
    }
}

impl BlockDevice for FileDisk {
    fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    fn read_block(&mut self, n: u32, buf: &mut Block) -> io::Result<()> {
        check_range(n, self.num_blocks)?;
        self.file.read_exact_at(buf, u64::from(n) * BLOCKSIZE as u64)
    }

    fn write_block(&mut self, n: u32, buf: &Block) -> io::Result<()> {
        check_range(n, self.num_blocks)?;
        self.file.write_all_at(buf, u64::from(n) * BLOCKSIZE as u64)
    }
}

/// An in-memory disk that counts the sector traffic reaching it.
#[derive(Debug, Clone)]
pub struct MemDisk {
    blocks: Vec<Block>,
    reads: usize,
    writes: usize,
    failing: bool,
}

impl MemDisk {
    pub fn new(num_blocks: u32) -> Self {
        Self {
            blocks: vec![[0; BLOCKSIZE]; num_blocks as usize],
            reads: 0,
            writes: 0,
            failing: false,
        }
    }

    pub const fn reads(&self) -> usize {
        self.reads
    }

    pub const fn writes(&self) -> usize {
        self.writes
    }

    pub fn reset_counters(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }

    /// Makes every following access fail, as a dead disk would.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// The stored contents of block `n`, bypassing the counters.
    pub fn raw(&self, n: u32) -> Option<&Block> {
        self.blocks.get(n as usize)
    }

    fn check(&self, n: u32) -> io::Result<()> {
        if self.failing {
            return Err(io::Error::other("disk failure"));
        }
        check_range(n, self.num_blocks())
    }
}

impl BlockDevice for MemDisk {
    fn num_blocks(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn read_block(&mut self, n: u32, buf: &mut Block) -> io::Result<()> {
        self.check(n)?;
        self.reads += 1;
        buf.copy_from_slice(&self.blocks[n as usize]);
        Ok(())
    }

    fn write_block(&mut self, n: u32, buf: &Block) -> io::Result<()> {
        self.check(n)?;
        self.writes += 1;
        self.blocks[n as usize].copy_from_slice(buf);
        Ok(())
    }
}
