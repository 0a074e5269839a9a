use crate::disk::{Disk, DiskBlock};
use crate::layout::{Geometry, FREE_SPACE_BLOCK, ROOT_DIRECTORY_BLOCK};
use crate::{BlockFSError, BlockFSErrorConvertible};
use alloc::{vec, vec::Vec};
use log::{debug, warn};

/// Status byte of a block that may be handed out.
pub const FREE: u8 = 0x00;
/// Status byte of a block in use.
pub const ALLOCATED: u8 = 0x01;

/// First block number the allocator may hand out.
const FIRST_DATA_BLOCK: u64 = ROOT_DIRECTORY_BLOCK + 1;

#[derive(Clone, Debug, PartialEq, Eq)]
/// In memory copy of the allocation table. Byte `n` is the status of block `n`.
pub struct FreeSpaceTable {
    /// The block this copy was last loaded from.
    block: u64,
    status: Vec<u8>,
}

impl FreeSpaceTable {
    /// The table as written by a format: only the table itself and the root directory are in use.
    pub fn formatted(geometry: Geometry) -> Self {
        let mut status = vec![FREE; geometry.block_size as usize];
        status[FREE_SPACE_BLOCK as usize] = ALLOCATED;
        status[ROOT_DIRECTORY_BLOCK as usize] = ALLOCATED;

        return Self {
            block: FREE_SPACE_BLOCK,
            status,
        };
    }

    pub fn load<E: BlockFSErrorConvertible>(
        disk: &Disk<E>,
        block: u64,
    ) -> Result<Self, BlockFSError<E>> {
        return disk.load(block);
    }

    fn reload<E: BlockFSErrorConvertible>(
        &mut self,
        disk: &Disk<E>,
        block: u64,
    ) -> Result<(), BlockFSError<E>> {
        *self = disk.load(block)?;

        return Ok(());
    }

    #[inline]
    pub fn loaded_block(&self) -> u64 {
        return self.block;
    }

    pub fn as_bytes(&self) -> &[u8] {
        return &self.status;
    }

    pub fn is_allocated(&self, block: u64) -> bool {
        return match self.status.get(block as usize) {
            Some(s) => *s != FREE,
            None => false,
        };
    }

    /// The number of blocks that can still be allocated.
    pub fn free_block_count(&self, block_count: u64) -> u64 {
        return (FIRST_DATA_BLOCK..block_count)
            .filter(|b| !self.is_allocated(*b))
            .count() as u64;
    }

    /// Claims the first `count` free blocks in block number order.
    /// Either all of them are claimed and persisted or the table is left untouched.
    /// The cached copy is reloaded from the block it held before the call.
    pub fn allocate<E: BlockFSErrorConvertible>(
        &mut self,
        disk: &mut Disk<E>,
        count: usize,
    ) -> Result<Vec<u16>, BlockFSError<E>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let previous = self.block;
        self.reload(disk, FREE_SPACE_BLOCK)?;

        let mut found = Vec::with_capacity(count);

        for block in FIRST_DATA_BLOCK..disk.block_count() {
            if self.status[block as usize] == FREE {
                found.push(block as u16);

                if found.len() == count {
                    break;
                }
            }
        }

        if found.len() < count {
            warn!(
                "cannot allocate {} blocks, only {} are free",
                count,
                found.len()
            );
            self.reload(disk, previous)?;

            return Err(BlockFSError::NotEnoughFreeBlocks);
        }

        for block in &found {
            self.status[*block as usize] = ALLOCATED;
        }

        let stored = disk.store(&*self);
        let restored = self.reload(disk, previous);
        stored?;
        restored?;

        debug!("allocated blocks {:?}", found);

        return Ok(found);
    }

    /// Returns `blocks` to the free pool. Reserved or out of range block numbers are rejected before anything changes.
    pub fn deallocate<E: BlockFSErrorConvertible>(
        &mut self,
        disk: &mut Disk<E>,
        blocks: &[u16],
    ) -> Result<(), BlockFSError<E>> {
        if blocks.is_empty() {
            return Ok(());
        }

        for block in blocks {
            let block = *block as u64;

            if block < FIRST_DATA_BLOCK || block >= disk.block_count() {
                return Err(BlockFSError::BlockOutOfRange(block));
            }
        }

        let previous = self.block;
        self.reload(disk, FREE_SPACE_BLOCK)?;

        for block in blocks {
            if self.status[*block as usize] == FREE {
                warn!("block {} was already free", block);
            }

            self.status[*block as usize] = FREE;
        }

        let stored = disk.store(&*self);
        let restored = self.reload(disk, previous);
        stored?;
        restored?;

        debug!("deallocated blocks {:?}", blocks);

        return Ok(());
    }
}

impl DiskBlock for FreeSpaceTable {
    #[inline]
    fn block_number(&self) -> u64 {
        return self.block;
    }

    fn from_block(block: u64, bytes: &[u8]) -> Option<Self> {
        return Some(Self {
            block,
            status: bytes.to_vec(),
        });
    }

    fn to_block_bytes(&self, block_size: usize) -> Vec<u8> {
        let mut bytes = self.status.clone();
        bytes.resize(block_size, FREE);

        return bytes;
    }
}
