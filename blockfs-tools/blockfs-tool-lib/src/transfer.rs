use crate::error::ToolError;
use blockfs::FileSystem;
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Bytes moved between the host and the image per call.
pub const CHUNK_SIZE: usize = 1000;

/// Copies a host file into the image as `name`, replacing any file already there.
/// Returns the number of bytes imported.
pub fn import_file(
    fs: &mut FileSystem<ToolError>,
    host_path: &Path,
    name: &str,
) -> Result<u64, ToolError> {
    let mut file = match File::open(host_path) {
        Ok(f) => f,
        Err(e) => {
            return Err(ToolError::new(&format!(
                "Could not open {} due to error: {}",
                host_path.display(),
                e
            )))
        }
    };

    fs.create_file(name).map_err(ToolError::from_fs)?;

    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let amount_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(s) => s,
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Error while reading: {}",
                    e
                )))
            }
        };

        let appended = fs
            .append(name, &buffer[..amount_read])
            .map_err(ToolError::from_fs)?;
        total += appended as u64;

        if appended < amount_read {
            return Err(ToolError::new(&format!(
                "{} does not fit, only {} bytes were imported",
                host_path.display(),
                total
            )));
        }
    }

    debug!("imported {} bytes from {}", total, host_path.display());

    return Ok(total);
}

/// Copies the file `name` out of the image into a new host file.
/// Returns the number of bytes exported.
pub fn export_file(
    fs: &FileSystem<ToolError>,
    name: &str,
    host_path: &Path,
) -> Result<u64, ToolError> {
    if !fs.exists_file(name).map_err(ToolError::from_fs)? {
        if fs.exists_directory(name).map_err(ToolError::from_fs)? {
            return Err(ToolError::new(&format!("{} is a directory", name)));
        }

        return Err(ToolError::new(&format!("{} does not exist", name)));
    }

    let mut file = match File::create(host_path) {
        Ok(f) => f,
        Err(e) => {
            return Err(ToolError::new(&format!(
                "Could not create {} due to error: {}",
                host_path.display(),
                e
            )))
        }
    };

    let mut offset = 0u64;

    while let Some(chunk) = fs
        .read_range(name, offset, CHUNK_SIZE as u64)
        .map_err(ToolError::from_fs)?
    {
        match file.write_all(&chunk) {
            Ok(_) => (),
            Err(e) => {
                return Err(ToolError::new(&format!(
                    "Error while writing: {}",
                    e
                )))
            }
        }

        offset += chunk.len() as u64;
    }

    debug!("exported {} bytes to {}", offset, host_path.display());

    return Ok(offset);
}
