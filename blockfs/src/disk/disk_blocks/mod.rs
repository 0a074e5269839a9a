mod data_block;
mod directory_block;
mod inode;

pub use data_block::DataBlock;
pub use directory_block::{DirectoryBlock, DirectoryEntry};
pub use inode::{blocks_for_size, is_name_character, validate_name, Inode};

use alloc::vec::Vec;

/// The contract shared by every kind of block the file system places on disk.
/// Each implementor is bound to the physical block it was read from or will be written to.
pub trait DiskBlock: Sized {
    fn block_number(&self) -> u64;

    /// Decodes a block from exactly one block's worth of bytes.
    fn from_block(block: u64, bytes: &[u8]) -> Option<Self>;

    /// Encodes the block, padded with zeros to `block_size`.
    fn to_block_bytes(&self, block_size: usize) -> Vec<u8>;
}
