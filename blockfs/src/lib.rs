#![no_std]

extern crate alloc;

mod blockfs_error;
mod byte_serializable;
mod disk;
mod file_system;
mod free_space;
pub mod layout;
mod path;

pub use blockfs_error::{BlockFSError, BlockFSErrorConvertible};
pub use byte_serializable::ByteSerializable;
pub use disk::*;
pub use file_system::FileSystem;
pub use free_space::{FreeSpaceTable, ALLOCATED, FREE};
pub use layout::{
    Geometry, DEFAULT_BLOCK_COUNT, DEFAULT_BLOCK_SIZE, DIRECTORY_BLOCK_SIZE, FREE_SPACE_BLOCK,
    INODE_SIZE, MAX_FILES, MAX_FILE_BLOCKS, NAME_SIZE, ROOT_DIRECTORY_BLOCK,
};
pub use path::{check_path, split_path};
