mod error;
mod handler;
mod transfer;

pub use error::ToolError;
pub use handler::Handler;
pub use transfer::{export_file, import_file, CHUNK_SIZE};
use blockfs::Geometry;
use byte_unit::Byte;
use std::convert::TryFrom;

/// Parses a size such as `4KiB`. Sizes that do not fit in a u64 are rejected.
pub fn sized_string_to_u64(string: &str) -> Option<u64> {
    return match Byte::from_str(string) {
        Ok(b) => u64::try_from(b.get_bytes()).ok(),
        Err(_) => None,
    };
}

pub fn u64_to_sized_string(n: u64) -> String {
    return Byte::from(n).get_appropriate_unit(false).to_string();
}

/// Builds a geometry from the optional `--block-size` and `--blocks` values, defaulting each one.
pub fn geometry_from_arguments(
    block_size: Option<&str>,
    blocks: Option<&str>,
) -> Result<Geometry, ToolError> {
    let mut geometry = Geometry::default();

    if let Some(s) = block_size {
        geometry.block_size = match sized_string_to_u64(s) {
            Some(n) => n,
            None => return Err(ToolError::new(&format!("Invalid block size: {}", s))),
        };
    }

    if let Some(s) = blocks {
        geometry.block_count = match s.parse::<u64>() {
            Ok(n) => n,
            Err(_) => return Err(ToolError::new(&format!("Invalid block count: {}", s))),
        };
    }

    return Ok(geometry);
}
