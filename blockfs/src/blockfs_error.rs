use alloc::string::String;
use core::fmt::{Debug, Display};

macro_rules! enum_variant_stringify {
    ($self:expr, [$($var:ident),+]) => {
        match $self {
            $(
               $var => stringify!($var),
            )+
            _ => "",
        }
    }
}

pub trait BlockFSErrorConvertible: Debug {
    /// Wraps a storage error raised by a disk handler.
    fn into_blockfs_error(self) -> BlockFSError<Self>
    where
        Self: Sized,
    {
        return BlockFSError::DiskError(self);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockFSError<E> {
    InvalidBlockSize,
    InvalidBlockCount,
    BlockOutOfRange(u64),
    IncompleteBlock(u64),
    CorruptedBlock(u64),
    CorruptedInode(String),
    InvalidName(String),
    NameTooLong(String),
    ParentNotFound(String),
    NotFound(String),
    EntryExists(String),
    DirectoryFull,
    DirectoryNotEmpty(String),
    NotEnoughFreeBlocks,
    FileTooLarge(String),
    IsADirectory(String),
    NotADirectory(String),
    InvalidMove(String),
    DiskError(E),
}

impl<E: Display> core::fmt::Display for BlockFSError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use BlockFSError::*;

        match self {
            DiskError(e) => write!(f, "Disk error: {}", e),
            BlockOutOfRange(n) => write!(f, "Block {} is outside the disk", n),
            IncompleteBlock(n) => write!(f, "Block {} could not be read completely", n),
            CorruptedBlock(n) => write!(f, "Block {} could not be decoded", n),
            CorruptedInode(n) => write!(f, "The block pointers of {} do not cover its size", n),
            InvalidName(n) => write!(f, "Ill-formed name ({})", n),
            NameTooLong(n) => write!(f, "Name too long ({})", n),
            ParentNotFound(n) => write!(f, "The parent directory of {} does not exist", n),
            NotFound(n) => write!(f, "{} does not exist", n),
            EntryExists(n) => write!(f, "{} already exists", n),
            DirectoryNotEmpty(n) => write!(f, "{} is not empty", n),
            FileTooLarge(n) => write!(f, "{} cannot grow any larger", n),
            IsADirectory(n) => write!(f, "{} is a directory", n),
            NotADirectory(n) => write!(f, "{} is not a directory", n),
            InvalidMove(n) => write!(f, "Invalid move: {}", n),
            _ => write!(
                f,
                "{}",
                enum_variant_stringify!(
                    self,
                    [
                        InvalidBlockSize,
                        InvalidBlockCount,
                        DirectoryFull,
                        NotEnoughFreeBlocks
                    ]
                )
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BlockFSError;
    use alloc::format;
    use alloc::string::String;

    #[derive(Debug)]
    struct DummyError;

    impl core::fmt::Display for DummyError {
        fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
            write!(f, "DummyError")
        }
    }

    #[test]
    fn test_fmt_1() {
        let err: BlockFSError<DummyError> = BlockFSError::DirectoryFull;
        assert_eq!("DirectoryFull", format!("{}", err));
    }

    #[test]
    fn test_fmt_2() {
        let err: BlockFSError<DummyError> = BlockFSError::InvalidBlockSize;
        assert_eq!("InvalidBlockSize", format!("{}", err));
    }

    #[test]
    fn test_fmt_3() {
        let err: BlockFSError<DummyError> = BlockFSError::DiskError(DummyError);
        assert_eq!("Disk error: DummyError", format!("{}", err));
    }

    #[test]
    fn test_fmt_4() {
        let err: BlockFSError<DummyError> = BlockFSError::ParentNotFound(String::from("a/b"));
        assert_eq!("The parent directory of a/b does not exist", format!("{}", err));
    }

    #[test]
    fn test_fmt_5() {
        let err: BlockFSError<DummyError> = BlockFSError::BlockOutOfRange(300);
        assert_eq!("Block 300 is outside the disk", format!("{}", err));
    }
}
