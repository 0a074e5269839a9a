use super::disk_blocks::{DirectoryBlock, DiskBlock};
use super::DiskHandler;
use crate::free_space::FreeSpaceTable;
use crate::layout::{Geometry, FREE_SPACE_BLOCK, ROOT_DIRECTORY_BLOCK};
use crate::{BlockFSError, BlockFSErrorConvertible};
use alloc::vec::Vec;
use log::debug;

/// Block addressed view over a host byte container.
pub struct Disk<'a, E: BlockFSErrorConvertible> {
    handler: &'a mut dyn DiskHandler<E>,
    geometry: Geometry,
}

macro_rules! unwrap_disk_error {
    ($v:expr) => {
        match $v {
            Ok(val) => val,
            Err(e) => return Err(e.into_blockfs_error()),
        }
    };
}

impl<'a, E: BlockFSErrorConvertible> Disk<'a, E> {
    /// Opens an existing container. Its size must already be exactly `block_count * block_size` bytes.
    pub fn open(
        handler: &'a mut dyn DiskHandler<E>,
        geometry: Geometry,
    ) -> Result<Self, BlockFSError<E>> {
        geometry.validate::<E>()?;

        let size = unwrap_disk_error!(handler.disk_size());

        if size != geometry.disk_size() {
            debug!(
                "disk container holds {} bytes, expected {}",
                size,
                geometry.disk_size()
            );
            return Err(BlockFSError::InvalidBlockCount);
        }

        return Ok(Self { handler, geometry });
    }

    /// Opens the container, resizing it to exactly `block_count * block_size` bytes if needed.
    pub fn create(
        handler: &'a mut dyn DiskHandler<E>,
        geometry: Geometry,
    ) -> Result<Self, BlockFSError<E>> {
        geometry.validate::<E>()?;

        let size = unwrap_disk_error!(handler.disk_size());

        if size != geometry.disk_size() {
            debug!(
                "resizing disk container from {} to {} bytes",
                size,
                geometry.disk_size()
            );
            unwrap_disk_error!(handler.set_disk_size(geometry.disk_size()));
        }

        return Ok(Self { handler, geometry });
    }

    /// Writes an empty free space table and root directory, then zeros every other block.
    pub fn format(&mut self) -> Result<(), BlockFSError<E>> {
        debug!(
            "formatting disk with {} blocks of {} bytes",
            self.geometry.block_count, self.geometry.block_size
        );

        self.store(&FreeSpaceTable::formatted(self.geometry))?;
        self.store(&DirectoryBlock::new(ROOT_DIRECTORY_BLOCK))?;

        let start = (ROOT_DIRECTORY_BLOCK + 1) * self.geometry.block_size;
        unwrap_disk_error!(self.handler.zero_range(start, self.geometry.disk_size()));

        return Ok(());
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        return self.geometry;
    }

    #[inline]
    pub fn block_size(&self) -> u64 {
        return self.geometry.block_size;
    }

    #[inline]
    pub fn block_count(&self) -> u64 {
        return self.geometry.block_count;
    }

    /// Reads exactly one block.
    pub fn read_block(&self, block: u64) -> Result<Vec<u8>, BlockFSError<E>> {
        self.check_block(block)?;

        let bytes = unwrap_disk_error!(self
            .handler
            .read_bytes(block * self.geometry.block_size, self.geometry.block_size));

        if bytes.len() as u64 != self.geometry.block_size {
            return Err(BlockFSError::IncompleteBlock(block));
        }

        return Ok(bytes);
    }

    /// Writes exactly one block. Shorter input is padded with zeros.
    pub fn write_block(&mut self, block: u64, bytes: &[u8]) -> Result<(), BlockFSError<E>> {
        self.check_block(block)?;

        if bytes.len() as u64 > self.geometry.block_size {
            return Err(BlockFSError::InvalidBlockSize);
        }

        let location = block * self.geometry.block_size;

        if bytes.len() as u64 == self.geometry.block_size {
            unwrap_disk_error!(self.handler.write_bytes(bytes, location));
        } else {
            let mut padded = bytes.to_vec();
            padded.resize(self.geometry.block_size as usize, 0);
            unwrap_disk_error!(self.handler.write_bytes(&padded, location));
        }

        return Ok(());
    }

    /// Reads block `block` and decodes it as `T`.
    pub fn load<T: DiskBlock>(&self, block: u64) -> Result<T, BlockFSError<E>> {
        let bytes = self.read_block(block)?;

        return match T::from_block(block, &bytes) {
            Some(b) => Ok(b),
            None => Err(BlockFSError::CorruptedBlock(block)),
        };
    }

    /// Writes `block` back to the physical block it is bound to.
    pub fn store<T: DiskBlock>(&mut self, block: &T) -> Result<(), BlockFSError<E>> {
        let bytes = block.to_block_bytes(self.geometry.block_size as usize);

        return self.write_block(block.block_number(), &bytes);
    }

    fn check_block(&self, block: u64) -> Result<(), BlockFSError<E>> {
        if block >= self.geometry.block_count {
            return Err(BlockFSError::BlockOutOfRange(block));
        }

        return Ok(());
    }
}
