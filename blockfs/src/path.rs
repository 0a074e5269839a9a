use crate::disk::is_name_character;
use crate::BlockFSError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Checks that `path` only holds name characters and single '/' separators.
pub fn check_path<E>(path: &str) -> Result<(), BlockFSError<E>> {
    if !path.chars().all(|c| c == '/' || is_name_character(c)) || path.contains("//") {
        return Err(BlockFSError::InvalidName(path.to_string()));
    }

    return Ok(());
}

/// Splits a path into its segments. One leading and one trailing '/' are ignored and the empty path is root.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.is_empty() {
        return Vec::new();
    }

    return path.split('/').collect();
}

pub fn join_path(segments: &[&str]) -> String {
    return segments.join("/");
}
