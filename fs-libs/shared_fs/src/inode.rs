use io_error::IOError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{BLOCKSIZE, FileType, INODES_PER_BLOCK, INODESIZE, NUM_DIRECT, Stat};

#[derive(IntoPrimitive, TryFromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum InodeType {
    Free = 0,
    Directory = 1,
    Regular = 2,
    Symlink = 3,
}

impl Default for InodeType {
    fn default() -> Self {
        Self::Free
    }
}

impl InodeType {
    pub const fn file_type(self) -> Option<FileType> {
        match self {
            Self::Free => None,
            Self::Directory => Some(FileType::Directory),
            Self::Regular => Some(FileType::RegularFile),
            Self::Symlink => Some(FileType::SymbolicLink),
        }
    }
}

/// Returns the block holding inode `inum` and the byte offset of its record
/// inside that block. Slot 0 of block 1 is taken by the [`FsHeader`].
pub const fn inode_location(inum: u32) -> (u32, usize) {
    let block = inum / INODES_PER_BLOCK as u32 + 1;
    let offset = (inum as usize % INODES_PER_BLOCK) * INODESIZE;
    (block, offset)
}

/// Number of blocks, starting at block 1, used by the header and the inode
/// table of a filesystem with `num_inodes` inodes.
pub const fn inode_table_blocks(num_inodes: u32) -> u32 {
    ((num_inodes as usize + 1) * INODESIZE).div_ceil(BLOCKSIZE) as u32
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// The header stored in the first inode slot of block 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsHeader {
    pub num_blocks: u32,
    pub num_inodes: u32,
}

impl FsHeader {
    pub fn decode(bytes: &[u8]) -> Self {
        Self {
            num_blocks: read_u32(bytes, 0),
            num_inodes: read_u32(bytes, 4),
        }
    }

    pub fn encode(&self, out: &mut [u8]) {
        out[..INODESIZE].fill(0);
        write_u32(out, 0, self.num_blocks);
        write_u32(out, 4, self.num_inodes);
    }

    /// First block after the inode table.
    pub const fn first_data_block(&self) -> u32 {
        inode_table_blocks(self.num_inodes) + 1
    }
}

/// In-memory copy of an on-disk inode record.
///
/// Layout (little-endian): `type: i16`, `nlink: i16`, `reuse: i32`,
/// `size: i32`, `direct: [i32; 12]`, `indirect: i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inode {
    pub kind: InodeType,
    pub nlink: u16,
    pub reuse: u32,
    pub size: u32,
    pub direct: [u32; NUM_DIRECT],
    pub indirect: u32,
}

impl Inode {
    const DIRECT_AT: usize = 12;
    const INDIRECT_AT: usize = Self::DIRECT_AT + NUM_DIRECT * 4;

    /// A fresh object of the given type with a single link.
    pub const fn new(kind: InodeType, reuse: u32) -> Self {
        Self {
            kind,
            nlink: 1,
            reuse,
            size: 0,
            direct: [0; NUM_DIRECT],
            indirect: 0,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, IOError> {
        let kind = InodeType::try_from(read_u16(bytes, 0) as i16).map_err(|_| IOError::Corrupted)?;

        let mut direct = [0; NUM_DIRECT];
        for (i, slot) in direct.iter_mut().enumerate() {
            *slot = read_u32(bytes, Self::DIRECT_AT + i * 4);
        }

        Ok(Self {
            kind,
            nlink: read_u16(bytes, 2),
            reuse: read_u32(bytes, 4),
            size: read_u32(bytes, 8),
            direct,
            indirect: read_u32(bytes, Self::INDIRECT_AT),
        })
    }

    pub fn encode(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&i16::from(self.kind).to_le_bytes());
        out[2..4].copy_from_slice(&self.nlink.to_le_bytes());
        write_u32(out, 4, self.reuse);
        write_u32(out, 8, self.size);
        for (i, block) in self.direct.iter().enumerate() {
            write_u32(out, Self::DIRECT_AT + i * 4, *block);
        }
        write_u32(out, Self::INDIRECT_AT, self.indirect);
    }

    pub const fn is_free(&self) -> bool {
        matches!(self.kind, InodeType::Free)
    }

    /// Number of logical blocks needed to hold `size` bytes.
    pub const fn block_count(&self) -> usize {
        (self.size as usize).div_ceil(BLOCKSIZE)
    }

    pub fn stat(&self, inum: u32) -> Option<Stat> {
        Some(Stat {
            inum,
            file_type: self.kind.file_type()?,
            size: self.size,
            nlink: self.nlink,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inode_record_layout() {
        let mut inode = Inode::new(InodeType::Regular, 7);
        inode.size = 1000;
        inode.direct[0] = 20;
        inode.direct[11] = 31;
        inode.indirect = 40;

        let mut buf = [0xffu8; INODESIZE];
        inode.encode(&mut buf);

        assert_eq!(&buf[0..2], &2i16.to_le_bytes());
        assert_eq!(&buf[2..4], &1u16.to_le_bytes());
        assert_eq!(&buf[12..16], &20u32.to_le_bytes());
        assert_eq!(&buf[60..64], &40u32.to_le_bytes());
        assert_eq!(inode, Inode::decode(&buf).unwrap());
    }

    #[test]
    fn unknown_type_is_corrupted() {
        let mut buf = [0u8; INODESIZE];
        buf[0] = 9;
        assert_eq!(Err(IOError::Corrupted), Inode::decode(&buf));
    }

    #[test]
    fn locations() {
        assert_eq!((1, 0), inode_location(0));
        assert_eq!((1, INODESIZE), inode_location(1));
        assert_eq!((2, 0), inode_location(8));
        assert_eq!((2, 3 * INODESIZE), inode_location(11));
        // 47 inodes + header fit in 6 blocks
        assert_eq!(6, inode_table_blocks(47));
        assert_eq!(7, inode_table_blocks(48));
    }

    #[test]
    fn header_first_data_block() {
        let header = FsHeader {
            num_blocks: 1426,
            num_inodes: 47,
        };
        let mut buf = [0u8; INODESIZE];
        header.encode(&mut buf);
        assert_eq!(header, FsHeader::decode(&buf));
        assert_eq!(7, header.first_data_block());
    }
}
