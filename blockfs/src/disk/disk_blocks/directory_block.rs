use super::{DiskBlock, Inode};
use crate::layout::{INODE_SIZE, MAX_FILES};
use crate::{BlockFSError, ByteSerializable};
use alloc::format;
use alloc::string::String;
use alloc::{vec, vec::Vec};

/// Column at which file sizes are printed in a listing.
const LIST_SIZE_COLUMN: usize = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One physical block holding a fixed table of inodes.
pub struct DirectoryBlock {
    block: u64,
    inodes: [Inode; MAX_FILES],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_file: bool,
    /// Always 0 for directories.
    pub size: u16,
}

impl DirectoryEntry {
    /// Renders the entry as it appears in a listing.
    pub fn render(&self, prefix: &str) -> String {
        let path = format!("{}/{}", prefix, self.name);

        if self.is_file {
            return format!("{:<width$}{}", path, self.size, width = LIST_SIZE_COLUMN);
        } else {
            return format!("{}/", path);
        }
    }
}

impl DirectoryBlock {
    /// An empty directory bound to `block`.
    pub fn new(block: u64) -> Self {
        return Self {
            block,
            inodes: [Inode::new(); MAX_FILES],
        };
    }

    /// Index of the first used slot named `name`.
    pub fn find_name(&self, name: &str) -> Option<usize> {
        return self
            .inodes
            .iter()
            .position(|node| node.is_used() && node.name_matches(name));
    }

    /// The index and a copy of the first used slot named `name`.
    pub fn lookup(&self, name: &str) -> Option<(usize, Inode)> {
        let index = self.find_name(name)?;

        return Some((index, self.inodes[index]));
    }

    pub fn num_entries(&self) -> usize {
        return self.inodes.iter().filter(|node| node.is_used()).count();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.num_entries() == 0;
    }

    /// Index of the first unused slot, without claiming it.
    pub fn free_slot(&self) -> Option<usize> {
        return self.inodes.iter().position(|node| !node.is_used());
    }

    /// Claims the first unused slot for `name` and returns its index. No slot changes on failure.
    pub fn allocate_free_slot<E>(
        &mut self,
        name: &str,
        is_file: bool,
    ) -> Result<usize, BlockFSError<E>> {
        let index = match self.free_slot() {
            Some(index) => index,
            None => return Err(BlockFSError::DirectoryFull),
        };

        self.inodes[index].alloc::<E>(name, is_file)?;

        return Ok(index);
    }

    pub fn deallocate_entry(&mut self, index: usize) {
        if let Some(node) = self.inodes.get_mut(index) {
            node.dealloc();
        }
    }

    pub fn inode(&self, index: usize) -> Option<&Inode> {
        return self.inodes.get(index);
    }

    pub fn inode_mut(&mut self, index: usize) -> Option<&mut Inode> {
        return self.inodes.get_mut(index);
    }

    /// Replaces the slot at `index` with `node`.
    pub fn set_inode(&mut self, index: usize, node: Inode) -> bool {
        if index >= MAX_FILES {
            return false;
        }

        self.inodes[index] = node;

        return true;
    }

    pub fn entries(&self) -> Vec<DirectoryEntry> {
        return self
            .inodes
            .iter()
            .filter(|node| node.is_used())
            .map(|node| DirectoryEntry {
                name: node.name(),
                is_file: node.is_file(),
                size: if node.is_file() { node.size() } else { 0 },
            })
            .collect();
    }

    /// One line per used slot, each prefixed with `prefix`.
    pub fn list(&self, prefix: &str) -> Vec<String> {
        let entries = self.entries();

        if entries.is_empty() {
            return vec![String::from("0 entries")];
        }

        return entries.iter().map(|entry| entry.render(prefix)).collect();
    }
}

impl DiskBlock for DirectoryBlock {
    #[inline]
    fn block_number(&self) -> u64 {
        return self.block;
    }

    fn from_block(block: u64, bytes: &[u8]) -> Option<Self> {
        if bytes.len() < MAX_FILES * INODE_SIZE {
            return None;
        }

        let mut directory = Self::new(block);

        for (i, node) in directory.inodes.iter_mut().enumerate() {
            *node = Inode::from_bytes(&bytes[i * INODE_SIZE..(i + 1) * INODE_SIZE])?;
        }

        return Some(directory);
    }

    fn to_block_bytes(&self, block_size: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; block_size];

        for (i, node) in self.inodes.iter().enumerate() {
            bytes[i * INODE_SIZE..(i + 1) * INODE_SIZE].copy_from_slice(&node.to_bytes());
        }

        return bytes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DIRECTORY_BLOCK_SIZE;

    fn full_directory() -> DirectoryBlock {
        let mut directory = DirectoryBlock::new(5);

        for i in 0..MAX_FILES {
            directory
                .allocate_free_slot::<()>(&format!("f{}", i), true)
                .unwrap();
        }

        return directory;
    }

    #[test]
    fn test_empty_directory() {
        let directory = DirectoryBlock::new(1);

        assert_eq!(directory.num_entries(), 0);
        assert_eq!(directory.find_name("a"), None);
        assert_eq!(directory.list(""), vec![String::from("0 entries")]);
    }

    #[test]
    fn test_allocate_and_find() {
        let mut directory = DirectoryBlock::new(1);

        assert_eq!(directory.allocate_free_slot::<()>("a", false), Ok(0));
        assert_eq!(directory.allocate_free_slot::<()>("b.txt", true), Ok(1));
        assert_eq!(directory.find_name("b.txt"), Some(1));
        assert_eq!(directory.num_entries(), 2);

        directory.deallocate_entry(0);
        assert_eq!(directory.find_name("a"), None);
        assert_eq!(directory.free_slot(), Some(0));
    }

    #[test]
    fn test_full_directory_is_unchanged() {
        let mut directory = full_directory();
        let before = directory.clone();

        assert_eq!(
            directory.allocate_free_slot::<()>("extra", true),
            Err(BlockFSError::DirectoryFull)
        );
        assert_eq!(directory, before);
    }

    #[test]
    fn test_invalid_name_claims_nothing() {
        let mut directory = DirectoryBlock::new(1);

        assert!(directory.allocate_free_slot::<()>("a b", true).is_err());
        assert_eq!(directory.num_entries(), 0);
    }

    #[test]
    fn test_list() {
        let mut directory = DirectoryBlock::new(1);
        directory.allocate_free_slot::<()>("sub", false).unwrap();
        let index = directory.allocate_free_slot::<()>("f.txt", true).unwrap();
        directory.inode_mut(index).unwrap().set_size(42);

        let lines = directory.list("a");

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "a/sub/");
        assert!(lines[1].starts_with("a/f.txt "));
        assert!(lines[1].ends_with("42"));
        assert_eq!(lines[1].len(), LIST_SIZE_COLUMN + 2);
    }

    #[test]
    fn test_block_round_trip() {
        let mut directory = full_directory();
        directory.deallocate_entry(3);
        directory.inode_mut(0).unwrap().set_block(0, 9);

        let bytes = directory.to_block_bytes(2048);
        assert_eq!(bytes.len(), 2048);
        assert_eq!(
            bytes[DIRECTORY_BLOCK_SIZE..].to_vec(),
            vec![0u8; 2048 - DIRECTORY_BLOCK_SIZE]
        );

        assert_eq!(DirectoryBlock::from_block(5, &bytes), Some(directory));
    }

    #[test]
    fn test_zeroed_block_is_empty_directory() {
        let directory = DirectoryBlock::from_block(7, &[0u8; DIRECTORY_BLOCK_SIZE]).unwrap();

        assert_eq!(directory.num_entries(), 0);
        assert_eq!(directory.block_number(), 7);
    }
}
