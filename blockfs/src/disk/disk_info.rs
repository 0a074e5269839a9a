use crate::{BlockFSErrorConvertible, FileSystem};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DiskInfo {
    block_size: u64,
    block_count: u64,
    free_block_count: u64,
    free_block_space: u64,
    max_file_size: u64,
}

impl DiskInfo {
    pub fn from_file_system<E: BlockFSErrorConvertible>(fs: &FileSystem<E>) -> Self {
        let geometry = fs.geometry();
        let free_block_count = fs.free_space().free_block_count(geometry.block_count);

        return Self {
            block_size: geometry.block_size,
            block_count: geometry.block_count,
            free_block_count,
            free_block_space: free_block_count * geometry.block_size,
            max_file_size: geometry.max_file_size(),
        };
    }

    #[inline]
    pub fn block_size(&self) -> u64 {
        return self.block_size;
    }

    #[inline]
    pub fn block_count(&self) -> u64 {
        return self.block_count;
    }

    #[inline]
    pub fn free_block_count(&self) -> u64 {
        return self.free_block_count;
    }

    #[inline]
    pub fn free_block_space(&self) -> u64 {
        return self.free_block_space;
    }

    #[inline]
    pub fn max_file_size(&self) -> u64 {
        return self.max_file_size;
    }
}
