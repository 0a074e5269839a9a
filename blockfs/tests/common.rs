extern crate blockfs;
use blockfs::{
    BlockFSErrorConvertible, DirectoryBlock, DiskHandler, FileSystem, Inode, FREE_SPACE_BLOCK,
    ROOT_DIRECTORY_BLOCK,
};
use std::collections::BTreeSet;

#[derive(Debug, PartialEq)]
pub struct Error {}

impl BlockFSErrorConvertible for Error {}

pub struct Handler {
    pub disk: Vec<u8>,
    /// Writes ending past this byte location fail.
    pub fail_writes_from: Option<u64>,
}

impl Handler {
    pub fn new(disk_size: usize) -> Self {
        return Self {
            disk: vec![0u8; disk_size],
            fail_writes_from: None,
        };
    }

    pub fn dump_disk(&self) -> Vec<u8> {
        return self.disk.clone();
    }

    fn check_write(&self, end: u64) -> Result<(), Error> {
        return match self.fail_writes_from {
            Some(limit) if end > limit => Err(Error {}),
            _ => Ok(()),
        };
    }
}

impl DiskHandler<Error> for Handler {
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), Error> {
        self.check_write(location + bytes.len() as u64)?;

        for (i, byte) in bytes.iter().enumerate() {
            self.disk[location as usize + i] = *byte;
        }

        return Ok(());
    }

    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, Error> {
        let location = location as usize;
        let amount = amount as usize;
        return Ok(self.disk[location..location + amount].to_vec());
    }

    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), Error> {
        self.check_write(end)?;

        for i in start..end {
            self.disk[i as usize] = 0;
        }

        return Ok(());
    }

    fn disk_size(&self) -> Result<u64, Error> {
        return Ok(self.disk.len() as u64);
    }

    fn set_disk_size(&mut self, size: u64) -> Result<(), Error> {
        self.disk.resize(size as usize, 0);

        return Ok(());
    }
}

fn collect_reachable(
    fs: &FileSystem<Error>,
    directory: &DirectoryBlock,
    path: &str,
    blocks: &mut BTreeSet<u64>,
) {
    for entry in directory.entries() {
        let child = format!("{}/{}", path, entry.name);
        let (_, node): (usize, Inode) = directory.lookup(&entry.name).unwrap();

        for block in node.owned_blocks() {
            assert!(blocks.insert(block as u64), "block {} is shared", block);
        }

        if node.is_directory() {
            // Resolving a child of the directory yields the directory itself as parent.
            let (sub, _) = fs.resolve(&format!("{}/x", child)).unwrap();
            collect_reachable(fs, &sub, &child, blocks);
        }
    }
}

/// Checks that the allocated blocks are exactly the reserved ones plus every block reachable from root.
pub fn allocated_blocks_match_reachable(fs: &FileSystem<Error>) {
    let mut reachable = BTreeSet::new();
    reachable.insert(FREE_SPACE_BLOCK);
    reachable.insert(ROOT_DIRECTORY_BLOCK);

    let (root, _) = fs.resolve("").unwrap();
    collect_reachable(fs, &root, "", &mut reachable);

    let allocated: BTreeSet<u64> = (0..fs.geometry().block_count)
        .filter(|b| fs.free_space().is_allocated(*b))
        .collect();

    assert_eq!(allocated, reachable);
}
