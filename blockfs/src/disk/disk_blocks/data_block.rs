use super::DiskBlock;
use alloc::{vec, vec::Vec};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raw file contents, the buffer occupies the entire block.
pub struct DataBlock {
    block: u64,
    buffer: Vec<u8>,
}

impl DataBlock {
    /// A zero filled block.
    pub fn new(block: u64, block_size: usize) -> Self {
        return Self {
            block,
            buffer: vec![0u8; block_size],
        };
    }

    pub fn bytes(&self) -> &[u8] {
        return &self.buffer;
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        return &mut self.buffer;
    }
}

impl DiskBlock for DataBlock {
    #[inline]
    fn block_number(&self) -> u64 {
        return self.block;
    }

    fn from_block(block: u64, bytes: &[u8]) -> Option<Self> {
        return Some(Self {
            block,
            buffer: bytes.to_vec(),
        });
    }

    fn to_block_bytes(&self, block_size: usize) -> Vec<u8> {
        let mut bytes = self.buffer.clone();
        bytes.resize(block_size, 0);

        return bytes;
    }
}
