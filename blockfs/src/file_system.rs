use crate::disk::{
    blocks_for_size, validate_name, DataBlock, DirectoryBlock, DirectoryEntry, Disk, DiskBlock,
    DiskHandler, DiskInfo, Inode,
};
use crate::free_space::FreeSpaceTable;
use crate::layout::{Geometry, FREE_SPACE_BLOCK, ROOT_DIRECTORY_BLOCK};
use crate::path::{check_path, join_path, split_path};
use crate::{BlockFSError, BlockFSErrorConvertible};
use alloc::string::{String, ToString};
use alloc::{vec, vec::Vec};
use core::cmp::min;
use log::{debug, trace, warn};

/// A mounted file system. Owns the disk and the cached free space table.
pub struct FileSystem<'a, E: BlockFSErrorConvertible> {
    disk: Disk<'a, E>,
    free_space: FreeSpaceTable,
}

/// What a path points at once resolved.
enum Target {
    Root(DirectoryBlock),
    Entry {
        parent: DirectoryBlock,
        index: usize,
        node: Inode,
    },
    Missing {
        parent: DirectoryBlock,
        leaf: String,
    },
}

impl<'a, E: BlockFSErrorConvertible> FileSystem<'a, E> {
    /// Sizes the container for `geometry` and formats it.
    pub fn make_new_filesystem(
        handler: &'a mut dyn DiskHandler<E>,
        geometry: Geometry,
    ) -> Result<Self, BlockFSError<E>> {
        let mut disk = Disk::create(handler, geometry)?;
        disk.format()?;

        let free_space = FreeSpaceTable::load(&disk, FREE_SPACE_BLOCK)?;

        return Ok(Self { disk, free_space });
    }

    /// Mounts an already formatted container. A container whose size does not match `geometry` is rejected untouched.
    pub fn open(
        handler: &'a mut dyn DiskHandler<E>,
        geometry: Geometry,
    ) -> Result<Self, BlockFSError<E>> {
        let disk = Disk::open(handler, geometry)?;
        let free_space = FreeSpaceTable::load(&disk, FREE_SPACE_BLOCK)?;

        if !free_space.is_allocated(FREE_SPACE_BLOCK)
            || !free_space.is_allocated(ROOT_DIRECTORY_BLOCK)
        {
            return Err(BlockFSError::CorruptedBlock(FREE_SPACE_BLOCK));
        }

        debug!(
            "opened file system with {} free blocks",
            free_space.free_block_count(geometry.block_count)
        );

        return Ok(Self { disk, free_space });
    }

    pub fn format(&mut self) -> Result<(), BlockFSError<E>> {
        self.disk.format()?;
        self.free_space = FreeSpaceTable::load(&self.disk, FREE_SPACE_BLOCK)?;

        return Ok(());
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        return self.disk.geometry();
    }

    #[inline]
    pub fn free_space(&self) -> &FreeSpaceTable {
        return &self.free_space;
    }

    pub fn disk_info(&self) -> DiskInfo {
        return DiskInfo::from_file_system(self);
    }

    /// Walks every segment but the last and returns the directory holding the leaf together with the leaf name.
    /// The root resolves to itself with an empty leaf.
    pub fn resolve(&self, path: &str) -> Result<(DirectoryBlock, String), BlockFSError<E>> {
        check_path::<E>(path)?;

        let segments = split_path(path);
        let mut directory: DirectoryBlock = self.disk.load(ROOT_DIRECTORY_BLOCK)?;

        let (leaf, parents) = match segments.split_last() {
            Some(s) => s,
            None => return Ok((directory, String::new())),
        };

        for segment in parents {
            trace!(
                "resolving {} in directory block {}",
                segment,
                directory.block_number()
            );

            directory = match directory.lookup(segment) {
                Some((_, node)) if node.is_directory() => self.directory_of(&node, path)?,
                _ => return Err(BlockFSError::ParentNotFound(path.to_string())),
            };
        }

        return Ok((directory, leaf.to_string()));
    }

    pub fn create_directory(&mut self, path: &str) -> Result<(), BlockFSError<E>> {
        let (mut parent, leaf) = match self.locate(path)? {
            Target::Root(_) => return Err(BlockFSError::InvalidName(path.to_string())),
            Target::Entry { .. } => return Err(BlockFSError::EntryExists(path.to_string())),
            Target::Missing { parent, leaf } => (parent, leaf),
        };

        let mut node = Inode::new();
        node.alloc::<E>(&leaf, false)?;

        let index = match parent.free_slot() {
            Some(i) => i,
            None => return Err(BlockFSError::DirectoryFull),
        };

        let blocks = self.free_space.allocate(&mut self.disk, 1)?;
        node.set_block(0, blocks[0]);
        parent.set_inode(index, node);

        let stored = self
            .disk
            .store(&DirectoryBlock::new(blocks[0] as u64))
            .and_then(|_| self.disk.store(&parent));

        if let Err(e) = stored {
            self.release_after_failure(&blocks);
            return Err(e);
        }

        debug!("created directory {} in block {}", path, blocks[0]);

        return Ok(());
    }

    /// Deletes an empty directory and releases its block.
    pub fn delete_directory(&mut self, path: &str) -> Result<(), BlockFSError<E>> {
        let (mut parent, index, node) = match self.locate(path)? {
            Target::Root(_) => return Err(BlockFSError::InvalidName(path.to_string())),
            Target::Missing { .. } => return Err(BlockFSError::NotFound(path.to_string())),
            Target::Entry {
                parent,
                index,
                node,
            } => (parent, index, node),
        };

        if node.is_file() {
            return Err(BlockFSError::NotADirectory(path.to_string()));
        }

        if !self.directory_of(&node, path)?.is_empty() {
            return Err(BlockFSError::DirectoryNotEmpty(path.to_string()));
        }

        parent.deallocate_entry(index);
        self.disk.store(&parent)?;
        self.free_space
            .deallocate(&mut self.disk, &node.owned_blocks())?;

        debug!("deleted directory {}", path);

        return Ok(());
    }

    /// Creates an empty file, or truncates an existing one to size 0 keeping its blocks.
    pub fn create_file(&mut self, path: &str) -> Result<(), BlockFSError<E>> {
        let parent = match self.locate(path)? {
            Target::Root(_) => return Err(BlockFSError::IsADirectory(path.to_string())),
            Target::Entry {
                mut parent,
                index,
                mut node,
            } => {
                if node.is_directory() {
                    return Err(BlockFSError::IsADirectory(path.to_string()));
                }

                node.set_size(0);
                parent.set_inode(index, node);
                debug!("truncated file {}", path);

                parent
            }
            Target::Missing { mut parent, leaf } => {
                validate_name::<E>(&leaf)?;
                parent.allocate_free_slot::<E>(&leaf, true)?;
                debug!("created file {}", path);

                parent
            }
        };

        self.disk.store(&parent)?;

        return Ok(());
    }

    /// Removes a file and releases every block it owns.
    pub fn delete_file(&mut self, path: &str) -> Result<(), BlockFSError<E>> {
        let (mut parent, index, node) = self.file_entry(path)?;

        parent.deallocate_entry(index);
        self.disk.store(&parent)?;
        self.free_space
            .deallocate(&mut self.disk, &node.owned_blocks())?;

        debug!("deleted file {}", path);

        return Ok(());
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, BlockFSError<E>> {
        let (_, _, node) = self.file_entry(path)?;

        return self.read_node(&node, path, 0, node.size() as u64);
    }

    /// Reads at most `length` bytes starting at `offset`. Returns None once `offset` reaches the end of the file.
    pub fn read_range(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Option<Vec<u8>>, BlockFSError<E>> {
        let (_, _, node) = self.file_entry(path)?;
        let size = node.size() as u64;

        if offset >= size {
            return Ok(None);
        }

        let length = min(length, size - offset);

        return Ok(Some(self.read_node(&node, path, offset, length)?));
    }

    /// Missing parents count as absent rather than as an error.
    pub fn exists_file(&self, path: &str) -> Result<bool, BlockFSError<E>> {
        return match self.locate(path) {
            Ok(Target::Entry { node, .. }) => Ok(node.is_file()),
            Ok(_) => Ok(false),
            Err(BlockFSError::ParentNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        };
    }

    pub fn exists_directory(&self, path: &str) -> Result<bool, BlockFSError<E>> {
        return match self.locate(path) {
            Ok(Target::Root(_)) => Ok(true),
            Ok(Target::Entry { node, .. }) => Ok(node.is_directory()),
            Ok(Target::Missing { .. }) => Ok(false),
            Err(BlockFSError::ParentNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        };
    }

    /// The listing of a directory, or the single line of a file.
    pub fn list(&self, path: &str) -> Result<Vec<String>, BlockFSError<E>> {
        let target = self.locate(path)?;
        let segments = split_path(path);
        let prefix = join_path(&segments);

        return match target {
            Target::Root(directory) => Ok(directory.list(&prefix)),
            Target::Entry { node, .. } if node.is_directory() => {
                Ok(self.directory_of(&node, path)?.list(&prefix))
            }
            Target::Entry { node, .. } => {
                let entry = DirectoryEntry {
                    name: node.name(),
                    is_file: true,
                    size: node.size(),
                };
                let parent_prefix = join_path(&segments[..segments.len() - 1]);

                Ok(vec![entry.render(&parent_prefix)])
            }
            Target::Missing { .. } => Err(BlockFSError::NotFound(path.to_string())),
        };
    }

    pub fn entries(&self, path: &str) -> Result<Vec<DirectoryEntry>, BlockFSError<E>> {
        return match self.locate(path)? {
            Target::Root(directory) => Ok(directory.entries()),
            Target::Entry { node, .. } if node.is_directory() => {
                Ok(self.directory_of(&node, path)?.entries())
            }
            Target::Entry { .. } => Err(BlockFSError::NotADirectory(path.to_string())),
            Target::Missing { .. } => Err(BlockFSError::NotFound(path.to_string())),
        };
    }

    /// Appends as much of `bytes` as fits and returns how many bytes were appended.
    /// Blocks the file already owns are filled before new ones are allocated.
    pub fn append(&mut self, path: &str, bytes: &[u8]) -> Result<usize, BlockFSError<E>> {
        let (mut parent, index, mut node) = self.file_entry(path)?;

        if bytes.is_empty() {
            return Ok(0);
        }

        let capacity = self.disk.geometry().max_file_size();
        let size = node.size() as u64;

        if size >= capacity {
            return Err(BlockFSError::FileTooLarge(path.to_string()));
        }

        let amount = min(bytes.len() as u64, capacity - size);
        let end = size + amount;

        let owned = node.owned_blocks();
        let needed = blocks_for_size(end, self.disk.block_size());

        let allocated = if needed > owned.len() {
            self.free_space
                .allocate(&mut self.disk, needed - owned.len())?
        } else {
            Vec::new()
        };

        for (i, block) in allocated.iter().enumerate() {
            node.set_block(owned.len() + i, *block);
        }

        if let Err(e) = self.write_node(&node, path, &bytes[..amount as usize], size) {
            self.release_after_failure(&allocated);
            return Err(e);
        }

        node.set_size(end as u16);
        parent.set_inode(index, node);

        if let Err(e) = self.disk.store(&parent) {
            self.release_after_failure(&allocated);
            return Err(e);
        }

        debug!(
            "appended {} bytes to {}, {} new blocks",
            amount,
            path,
            allocated.len()
        );

        return Ok(amount as usize);
    }

    /// Moves an entry like `mv`. A file destination is replaced, a directory destination receives the source.
    /// Only the inode moves, the data blocks stay where they are.
    pub fn move_entry(&mut self, src: &str, dst: &str) -> Result<(), BlockFSError<E>> {
        let (source_parent, source_index, source_node) = match self.locate(src)? {
            Target::Root(_) => return Err(BlockFSError::InvalidMove(src.to_string())),
            Target::Missing { .. } => return Err(BlockFSError::NotFound(src.to_string())),
            Target::Entry {
                parent,
                index,
                node,
            } => (parent, index, node),
        };

        let source_name = source_node.name();
        let source_segments = split_path(src);
        let mut target_segments = split_path(dst);

        match self.locate(dst)? {
            Target::Root(_) => target_segments.push(&source_name),
            Target::Entry { node, .. } if node.is_directory() => {
                target_segments.push(&source_name)
            }
            Target::Entry { .. } if source_node.is_directory() => {
                return Err(BlockFSError::NotADirectory(dst.to_string()))
            }
            _ => {}
        }

        let target = join_path(&target_segments);

        if target_segments == source_segments {
            return Err(BlockFSError::InvalidMove(target));
        }

        if source_node.is_directory() && target_segments.starts_with(&source_segments) {
            return Err(BlockFSError::InvalidMove(target));
        }

        let (target_parent, target_index, replaced) = match self.locate(&target)? {
            Target::Root(_) => return Err(BlockFSError::InvalidMove(target)),
            Target::Entry { node, .. } if node.is_directory() => {
                return Err(BlockFSError::EntryExists(target))
            }
            Target::Entry {
                parent,
                index,
                node,
            } => (parent, Some(index), Some(node)),
            Target::Missing { parent, .. } => (parent, None, None),
        };

        let mut moved = source_node;
        moved.set_name::<E>(target_segments[target_segments.len() - 1])?;

        if source_parent.block_number() == target_parent.block_number() {
            let mut directory = target_parent;
            directory.deallocate_entry(source_index);

            let index = match target_index {
                Some(i) => i,
                None => source_index,
            };

            directory.set_inode(index, moved);
            self.disk.store(&directory)?;
        } else {
            let mut source_parent = source_parent;
            let mut target_parent = target_parent;

            let index = match target_index.or_else(|| target_parent.free_slot()) {
                Some(i) => i,
                None => return Err(BlockFSError::DirectoryFull),
            };

            target_parent.set_inode(index, moved);
            source_parent.deallocate_entry(source_index);

            self.disk.store(&target_parent)?;
            self.disk.store(&source_parent)?;
        }

        if let Some(node) = replaced {
            self.free_space
                .deallocate(&mut self.disk, &node.owned_blocks())?;
        }

        debug!("moved {} to {}", src, target);

        return Ok(());
    }

    /// Copies a file. A directory destination receives a file of the same name.
    /// Fails before the target is touched when the copy cannot fit. Returns the number of bytes copied.
    pub fn file_copy(&mut self, src: &str, dst: &str) -> Result<usize, BlockFSError<E>> {
        let (_, _, node) = self.file_entry(src)?;
        let content = self.read_node(&node, src, 0, node.size() as u64)?;

        let name = node.name();
        let target = if self.exists_directory(dst)? {
            let mut segments = split_path(dst);
            segments.push(&name);

            join_path(&segments)
        } else {
            dst.to_string()
        };

        let owned = match self.locate(&target)? {
            Target::Entry { node, .. } if node.is_file() => node.owned_blocks().len(),
            _ => 0,
        };
        let needed = blocks_for_size(content.len() as u64, self.disk.block_size());
        let free = self.free_space.free_block_count(self.disk.block_count()) as usize;

        if needed > owned + free {
            return Err(BlockFSError::NotEnoughFreeBlocks);
        }

        self.create_file(&target)?;

        return self.append(&target, &content);
    }

    /// Appends the contents of `src` onto `dst`. Returns the number of bytes appended.
    pub fn file_append(&mut self, src: &str, dst: &str) -> Result<usize, BlockFSError<E>> {
        let content = self.read(src)?;
        self.file_entry(dst)?;

        return self.append(dst, &content);
    }

    fn locate(&self, path: &str) -> Result<Target, BlockFSError<E>> {
        let (parent, leaf) = self.resolve(path)?;

        if leaf.is_empty() {
            return Ok(Target::Root(parent));
        }

        return match parent.lookup(&leaf) {
            Some((index, node)) => Ok(Target::Entry {
                parent,
                index,
                node,
            }),
            None => Ok(Target::Missing { parent, leaf }),
        };
    }

    /// Resolves a path that must name an existing file.
    fn file_entry(&self, path: &str) -> Result<(DirectoryBlock, usize, Inode), BlockFSError<E>> {
        return match self.locate(path)? {
            Target::Root(_) => Err(BlockFSError::IsADirectory(path.to_string())),
            Target::Missing { .. } => Err(BlockFSError::NotFound(path.to_string())),
            Target::Entry { node, .. } if node.is_directory() => {
                Err(BlockFSError::IsADirectory(path.to_string()))
            }
            Target::Entry {
                parent,
                index,
                node,
            } => Ok((parent, index, node)),
        };
    }

    fn directory_of(&self, node: &Inode, path: &str) -> Result<DirectoryBlock, BlockFSError<E>> {
        if node.first_block() == 0 {
            return Err(BlockFSError::CorruptedInode(path.to_string()));
        }

        return self.disk.load(node.first_block() as u64);
    }

    fn data_block_number(
        &self,
        node: &Inode,
        path: &str,
        index: usize,
    ) -> Result<u64, BlockFSError<E>> {
        return match node.block(index) {
            Some(b) if b != 0 => Ok(b as u64),
            _ => Err(BlockFSError::CorruptedInode(path.to_string())),
        };
    }

    fn read_node(
        &self,
        node: &Inode,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>, BlockFSError<E>> {
        let block_size = self.disk.block_size();
        let end = offset + length;

        let mut bytes = Vec::with_capacity(length as usize);
        let mut position = offset;

        while position < end {
            let within = position % block_size;
            let amount = min(block_size - within, end - position);

            let block = self.data_block_number(node, path, (position / block_size) as usize)?;
            let data: DataBlock = self.disk.load(block)?;

            bytes.extend_from_slice(&data.bytes()[within as usize..(within + amount) as usize]);
            position += amount;
        }

        return Ok(bytes);
    }

    /// Writes `bytes` at `offset` into the blocks `node` points at.
    fn write_node(
        &mut self,
        node: &Inode,
        path: &str,
        bytes: &[u8],
        offset: u64,
    ) -> Result<(), BlockFSError<E>> {
        let block_size = self.disk.block_size();

        let mut written = 0;
        let mut position = offset;

        while written < bytes.len() {
            let within = position % block_size;
            let amount = min(block_size - within, (bytes.len() - written) as u64) as usize;

            let block = self.data_block_number(node, path, (position / block_size) as usize)?;

            let mut data = if within == 0 {
                DataBlock::new(block, block_size as usize)
            } else {
                self.disk.load(block)?
            };

            data.bytes_mut()[within as usize..within as usize + amount]
                .copy_from_slice(&bytes[written..written + amount]);
            self.disk.store(&data)?;

            written += amount;
            position += amount as u64;
        }

        return Ok(());
    }

    fn release_after_failure(&mut self, blocks: &[u16]) {
        if let Err(e) = self.free_space.deallocate(&mut self.disk, blocks) {
            warn!("could not release blocks {:?}: {:?}", blocks, e);
        }
    }
}
