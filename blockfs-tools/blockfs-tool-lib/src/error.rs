use blockfs::{BlockFSError, BlockFSErrorConvertible};
use std::fmt::Formatter;

#[derive(Debug, PartialEq, Clone)]
pub struct ToolError {
    message: String,
}

impl ToolError {
    pub fn new(message: &str) -> Self {
        return ToolError {
            message: String::from(message),
        };
    }

    /// Flattens a file system error into its message.
    pub fn from_fs(error: BlockFSError<ToolError>) -> Self {
        return match error {
            BlockFSError::DiskError(e) => e,
            e => ToolError::new(&e.to_string()),
        };
    }

    pub fn get_message(&self) -> String {
        return self.message.clone();
    }
}

impl BlockFSErrorConvertible for ToolError {}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::ToolError;
    use blockfs::BlockFSError;

    #[test]
    fn test_from_fs() {
        let error = ToolError::from_fs(BlockFSError::NotFound(String::from("a/b")));
        assert_eq!(error.get_message(), "a/b does not exist");
    }

    #[test]
    fn test_from_fs_disk_error() {
        let error = ToolError::from_fs(BlockFSError::DiskError(ToolError::new("io")));
        assert_eq!(error, ToolError::new("io"));
    }
}
