use crate::layout::{INODE_SIZE, MAX_FILE_BLOCKS, NAME_SIZE};
use crate::{BlockFSError, ByteSerializable};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use byteorder::{BigEndian, ByteOrder};

#[derive(Copy, Clone, PartialEq, Eq)]
/// A directory slot describing one file or sub directory. It is of length 64 bytes
pub struct Inode {
    /// used, if unset the slot is free and nothing else in it means anything
    used: bool,
    /// file, set for files and unset for directories
    file: bool,
    /// name, ascii padded with null bytes
    name: [u8; NAME_SIZE],
    /// size in bytes, unused for directories
    size: u16,
    /// pointers to blocks, an unused pointer is 0. Directories only use the first.
    blocks: [u16; MAX_FILE_BLOCKS],
}

/// Returns true for the characters allowed in a single name.
pub fn is_name_character(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_' || c == '.';
}

/// Checks a single file or directory name (no '/').
pub fn validate_name<E>(name: &str) -> Result<(), BlockFSError<E>> {
    if name.is_empty() || !name.chars().all(is_name_character) {
        return Err(BlockFSError::InvalidName(name.to_string()));
    }

    if name.len() > NAME_SIZE {
        return Err(BlockFSError::NameTooLong(name.to_string()));
    }

    return Ok(());
}

/// The number of blocks needed to hold `size` bytes.
pub fn blocks_for_size(size: u64, block_size: u64) -> usize {
    if size % block_size != 0 {
        return (size / block_size + 1) as usize;
    } else {
        return (size / block_size) as usize;
    }
}

impl Inode {
    pub fn new() -> Self {
        return Self {
            used: false,
            file: true,
            name: [0u8; NAME_SIZE],
            size: 0,
            blocks: [0u16; MAX_FILE_BLOCKS],
        };
    }

    /// Marks the inode as used. Block pointers are left alone, the caller fills them from the free space table.
    pub fn alloc<E>(&mut self, name: &str, is_file: bool) -> Result<(), BlockFSError<E>> {
        self.set_name::<E>(name)?;
        self.used = true;
        self.file = is_file;
        self.size = 0;

        return Ok(());
    }

    /// Returns the inode to the free state.
    pub fn dealloc(&mut self) {
        *self = Self::new();
    }

    pub fn set_name<E>(&mut self, name: &str) -> Result<(), BlockFSError<E>> {
        validate_name::<E>(name)?;

        self.name = [0u8; NAME_SIZE];
        self.name[..name.len()].copy_from_slice(name.as_bytes());

        return Ok(());
    }

    pub fn name(&self) -> String {
        return self.name[..self.name_len()].iter().map(|b| *b as char).collect();
    }

    pub fn name_matches(&self, name: &str) -> bool {
        return &self.name[..self.name_len()] == name.as_bytes();
    }

    fn name_len(&self) -> usize {
        let mut len = NAME_SIZE;

        while len > 0 && self.name[len - 1] == 0 {
            len -= 1;
        }

        return len;
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        return self.used;
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        return self.file;
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        return !self.file;
    }

    #[inline]
    pub fn size(&self) -> u16 {
        return self.size;
    }

    pub fn set_size(&mut self, size: u16) {
        self.size = size;
    }

    pub fn block(&self, index: usize) -> Option<u16> {
        return self.blocks.get(index).copied();
    }

    /// Sets a block pointer and returns false if the index is outside the pointer array.
    pub fn set_block(&mut self, index: usize, block: u16) -> bool {
        if index >= MAX_FILE_BLOCKS {
            return false;
        }

        self.blocks[index] = block;

        return true;
    }

    /// The block holding a directory's entries.
    #[inline]
    pub fn first_block(&self) -> u16 {
        return self.blocks[0];
    }

    /// The blocks this inode holds, the leading run of non zero pointers.
    pub fn owned_blocks(&self) -> Vec<u16> {
        return self.blocks.iter().take_while(|b| **b != 0).copied().collect();
    }
}

impl Default for Inode {
    fn default() -> Self {
        return Self::new();
    }
}

impl ByteSerializable for Inode {
    type BytesArrayType = [u8; INODE_SIZE];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; INODE_SIZE];
        let mut offset = 0;

        bytes[offset] = self.used as u8;
        offset += 1;
        bytes[offset] = self.file as u8;
        offset += 1;

        bytes[offset..offset + NAME_SIZE].copy_from_slice(&self.name);
        offset += NAME_SIZE;

        BigEndian::write_u16(&mut bytes[offset..], self.size);
        offset += 2;

        for block in self.blocks.iter() {
            BigEndian::write_u16(&mut bytes[offset..], *block);
            offset += 2;
        }

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < INODE_SIZE {
            return None;
        }

        let mut offset = 0;
        let mut name = [0u8; NAME_SIZE];
        let mut blocks = [0u16; MAX_FILE_BLOCKS];

        let used = bytes[offset] != 0;
        offset += 1;
        let file = bytes[offset] != 0;
        offset += 1;

        name.copy_from_slice(&bytes[offset..offset + NAME_SIZE]);
        offset += NAME_SIZE;

        let size = BigEndian::read_u16(&bytes[offset..]);
        offset += 2;

        for block in blocks.iter_mut() {
            *block = BigEndian::read_u16(&bytes[offset..]);
            offset += 2;
        }

        return Some(Self {
            used,
            file,
            name,
            size,
            blocks,
        });
    }

    fn serialized_size() -> usize {
        return INODE_SIZE;
    }
}

impl core::fmt::Debug for Inode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return f
            .debug_struct("Inode")
            .field("used", &self.used)
            .field("file", &self.file)
            .field("name", &self.name())
            .field("size", &self.size)
            .field("blocks", &self.blocks)
            .finish();
    }
}
