// Disk layout:
// block 0 free space table, block 1 root directory,
// data and directory blocks handed out at run time ...

mod disk;
mod disk_blocks;
mod disk_info;
pub mod disk_handler;

pub use disk::Disk;
pub use disk_blocks::{
    blocks_for_size, is_name_character, validate_name, DataBlock, DirectoryBlock, DirectoryEntry,
    DiskBlock, Inode,
};
pub use disk_handler::DiskHandler;
pub use disk_info::DiskInfo;
