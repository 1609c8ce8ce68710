use io_error::{IOError, IOResult};
use log::info;
use shared_fs::{
    BLOCKSIZE, Block, DIRENTRY_SIZE, DirEntry, FsHeader, INODES_PER_BLOCK, INODESIZE, Inode,
    InodeType, ROOTINODE,
    inode::{inode_location, inode_table_blocks},
};

use crate::{BlockDevice, block_cache::disk_error};

/// Inodes in a default image: six table blocks, less the header slot.
pub const DEFAULT_NUM_INODES: u32 = 6 * INODES_PER_BLOCK as u32 - 1;

/// Lays an empty filesystem with `num_inodes` inodes over the whole device.
///
/// Every inode is free except the root directory, whose single block holds
/// `.` and `..`. All other blocks are zeroed.
pub fn format<D: BlockDevice>(disk: &mut D, num_inodes: u32) -> IOResult<FsHeader> {
    if num_inodes < ROOTINODE || num_inodes > i16::MAX as u32 {
        return Err(IOError::InvalidArgument);
    }

    let header = FsHeader {
        num_blocks: disk.num_blocks(),
        num_inodes,
    };
    let root_block = header.first_data_block();
    if root_block >= header.num_blocks {
        return Err(IOError::NoSpace);
    }

    let mut table: Vec<Block> = vec![[0; BLOCKSIZE]; inode_table_blocks(num_inodes) as usize];
    header.encode(&mut table[0][..INODESIZE]);

    let mut root = Inode::new(InodeType::Directory, 1);
    root.nlink = 2;
    root.size = 2 * DIRENTRY_SIZE as u32;
    root.direct[0] = root_block;
    let (block, offset) = inode_location(ROOTINODE);
    root.encode(&mut table[block as usize - 1][offset..offset + INODESIZE]);

    let mut dir: Block = [0; BLOCKSIZE];
    DirEntry::new(ROOTINODE as u16, ".")?.encode(&mut dir[..DIRENTRY_SIZE]);
    DirEntry::new(ROOTINODE as u16, "..")?.encode(&mut dir[DIRENTRY_SIZE..2 * DIRENTRY_SIZE]);

    let zero: Block = [0; BLOCKSIZE];
    for n in 0..header.num_blocks {
        let data = match n {
            0 => &zero,
            n if n < root_block => &table[n as usize - 1],
            n if n == root_block => &dir,
            _ => &zero,
        };
        disk.write_block(n, data)
            .map_err(|e| disk_error("write", n, &e))?;
    }

    info!(
        num_blocks = header.num_blocks,
        num_inodes = num_inodes;
        "Formatted filesystem"
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use shared_fs::NUMSECTORS;

    use super::*;
    use crate::MemDisk;

    #[test]
    fn default_layout() {
        let mut disk = MemDisk::new(NUMSECTORS);
        let header = format(&mut disk, DEFAULT_NUM_INODES).unwrap();
        assert_eq!(47, DEFAULT_NUM_INODES);
        assert_eq!(7, header.first_data_block());
        assert_eq!(NUMSECTORS as usize, disk.writes());

        assert_eq!(header, FsHeader::decode(disk.raw(1).unwrap()));
        let (block, offset) = inode_location(ROOTINODE);
        let root = Inode::decode(&disk.raw(block).unwrap()[offset..offset + INODESIZE]).unwrap();
        assert_eq!(InodeType::Directory, root.kind);
        assert_eq!(7, root.direct[0]);

        let dotdot = DirEntry::decode(&disk.raw(7).unwrap()[DIRENTRY_SIZE..]);
        assert_eq!("..", dotdot.name());
        assert_eq!(ROOTINODE as u16, dotdot.inum);
    }

    #[test]
    fn rejects_impossible_layouts() {
        let mut disk = MemDisk::new(4);
        assert_eq!(Err(IOError::NoSpace), format(&mut disk, DEFAULT_NUM_INODES));
        assert_eq!(Err(IOError::InvalidArgument), format(&mut disk, 0));
    }
}
