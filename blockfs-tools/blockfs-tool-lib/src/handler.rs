use crate::error::ToolError;
use blockfs::DiskHandler;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

/// Largest run of zeros written at once when clearing a range.
const ZERO_CHUNK: u64 = 64 * 1024;

/// An image file on the host.
pub struct Handler {
    file: RefCell<File>,
}

impl Handler {
    /// Opens an image file, creating an empty one if it does not exist. Making a file system sizes it.
    pub fn open_or_create(path: &str) -> Result<Self, ToolError> {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Failed to open or create {}. Error: {}",
                    path, e
                )))
            }
        };

        return Ok(Self {
            file: RefCell::new(file),
        });
    }

    /// Opens an existing image file.
    pub fn new(path: &str) -> Result<Self, ToolError> {
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Failed to open file {}. Error: {}",
                    path, e
                )))
            }
        };

        return Ok(Self {
            file: RefCell::new(file),
        });
    }

    fn seek(file: &mut File, location: u64) -> Result<(), ToolError> {
        return match file.seek(SeekFrom::Start(location)) {
            Ok(_) => Ok(()),
            Err(e) => Err(ToolError::new(&format!(
                "Failed to seek to location: {}. Error: {}",
                location, e
            ))),
        };
    }
}

impl DiskHandler<ToolError> for Handler {
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), ToolError> {
        let file = self.file.get_mut();
        Self::seek(file, location)?;

        return match file.write_all(bytes) {
            Ok(_) => Ok(()),
            Err(e) => Err(ToolError::new(&format!(
                "Failed to write bytes. Error: {}",
                e
            ))),
        };
    }

    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, ToolError> {
        if self.disk_size()? < location + amount {
            return Err(ToolError::new(&format!(
                "File is not large enough to read address: {}",
                location + amount
            )));
        }

        let mut file = self.file.borrow_mut();
        Self::seek(&mut file, location)?;

        let mut result = vec![0u8; amount as usize];
        match file.read_exact(&mut result) {
            Ok(_) => (),
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Failed to read bytes. Error: {}",
                    e
                )))
            }
        }

        return Ok(result);
    }

    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), ToolError> {
        let file = self.file.get_mut();
        Self::seek(file, start)?;

        let mut location = start;

        while location < end {
            let amount = std::cmp::min(ZERO_CHUNK, end - location);

            match file.write_all(&vec![0u8; amount as usize]) {
                Ok(_) => (),
                Err(e) => {
                    return Err(ToolError::new(&format!(
                        "Failed to write null bytes. Error: {}",
                        e
                    )))
                }
            }

            location += amount;
        }

        return Ok(());
    }

    fn disk_size(&self) -> Result<u64, ToolError> {
        let b = self.file.borrow();
        let metadata = match b.metadata() {
            Ok(m) => m,
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Could not determine file size. Error: {}",
                    e
                )))
            }
        };

        return Ok(metadata.len());
    }

    fn set_disk_size(&mut self, size: u64) -> Result<(), ToolError> {
        return match self.file.get_mut().set_len(size) {
            Ok(_) => Ok(()),
            Err(e) => Err(ToolError::new(&format!(
                "Could not resize the image to {} bytes. Error: {}",
                size, e
            ))),
        };
    }
}
