// Disk layout:
// block 0 free space table (one status byte per block), block 1 root directory,
// every other block is a data or directory block handed out by the free space table.

use crate::BlockFSError;

/// Maximum length of a file or directory name.
pub const NAME_SIZE: usize = 20;
/// Number of block pointers held by each inode.
pub const MAX_FILE_BLOCKS: usize = 20;
/// Number of inode slots held by each directory block.
pub const MAX_FILES: usize = 16;

/// Flags, name, size and the block pointers.
pub const INODE_SIZE: usize = 2 + NAME_SIZE + 2 + 2 * MAX_FILE_BLOCKS;
pub const DIRECTORY_BLOCK_SIZE: usize = MAX_FILES * INODE_SIZE;

pub const FREE_SPACE_BLOCK: u64 = 0;
pub const ROOT_DIRECTORY_BLOCK: u64 = 1;

pub const DEFAULT_BLOCK_SIZE: u64 = 1_024; // In bytes.
pub const DEFAULT_BLOCK_COUNT: u64 = 256;

/// Block numbers are stored as 16 bit values.
const MAX_BLOCK_COUNT: u64 = u16::MAX as u64 + 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: u64,
    pub block_count: u64,
}

impl Geometry {
    pub fn new(block_size: u64, block_count: u64) -> Self {
        return Self {
            block_size,
            block_count,
        };
    }

    /// Checks that a directory fits in one block and that block 0 can hold a status entry for every block.
    /// The whole disk must also be addressable as one byte range.
    pub fn validate<E>(&self) -> Result<(), BlockFSError<E>> {
        if self.block_size < DIRECTORY_BLOCK_SIZE as u64 || self.block_size > usize::MAX as u64 {
            return Err(BlockFSError::InvalidBlockSize);
        }

        if self.block_size.checked_mul(self.block_count).is_none() {
            return Err(BlockFSError::InvalidBlockSize);
        }

        if self.block_count < 2
            || self.block_count > self.block_size
            || self.block_count > MAX_BLOCK_COUNT
        {
            return Err(BlockFSError::InvalidBlockCount);
        }

        return Ok(());
    }

    #[inline]
    pub fn disk_size(&self) -> u64 {
        return self.block_size * self.block_count;
    }

    /// The largest size a single file can reach, bounded by the pointer array and the 16 bit size field.
    pub fn max_file_size(&self) -> u64 {
        let by_pointers = MAX_FILE_BLOCKS as u64 * self.block_size;

        if by_pointers < u16::MAX as u64 {
            return by_pointers;
        } else {
            return u16::MAX as u64;
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        return Self::new(DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_COUNT);
    }
}
