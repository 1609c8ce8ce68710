#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub mod dirent;
pub mod inode;

pub use dirent::DirEntry;
pub use inode::{FsHeader, Inode, InodeType};

/// Size of a disk sector, which is also the filesystem block size.
pub const BLOCKSIZE: usize = 512;
/// Default number of sectors on a disk image.
pub const NUMSECTORS: u32 = 1426;

pub const INODESIZE: usize = 64;
pub const INODES_PER_BLOCK: usize = BLOCKSIZE / INODESIZE;

pub const NUM_DIRECT: usize = 12;
pub const BLOCKS_PER_INDIRECT: usize = BLOCKSIZE / size_of::<u32>();
/// Largest number of data blocks a single inode can address.
pub const MAX_FILE_BLOCKS: usize = NUM_DIRECT + BLOCKS_PER_INDIRECT;

pub const DIRNAMELEN: usize = 30;
pub const DIRENTRY_SIZE: usize = 32;
pub const DIRENTRIES_PER_BLOCK: usize = BLOCKSIZE / DIRENTRY_SIZE;

/// Paths must be strictly shorter than this, leaving room for a terminator.
pub const MAXPATHNAMELEN: usize = 256;
pub const MAXSYMLINKS: usize = 20;

pub const ROOTINODE: u32 = 1;

pub type Block = [u8; BLOCKSIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Directory,
    RegularFile,
    SymbolicLink,
}

/// Reference point of a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Whence {
    Set,
    Cur,
    End,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Stat {
    pub inum: u32,
    pub file_type: FileType,
    pub size: u32,
    pub nlink: u16,
}
