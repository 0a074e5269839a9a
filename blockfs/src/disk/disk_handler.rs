use crate::BlockFSErrorConvertible;
use alloc::vec::Vec;

/// Implementors can define an error struct if they wish but they must implement methods to read and write from an image file or other byte container.
/// Locations and addresses are all in bytes, the disk translates block numbers before calling in.
pub trait DiskHandler<E: BlockFSErrorConvertible> {
    /// Write a slice of bytes to a location
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), E>;

    /// Read an amount of bytes from a location. If the resulting vector is not equal to the amount requested the disk will return an error.
    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, E>;

    /// This method should zero a range between two locations. Start should be inclusive whilst end should be exclusive.
    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), E>;

    /// This should return the raw container size.
    fn disk_size(&self) -> Result<u64, E>;

    /// Grow or shrink the container to exactly `size` bytes.
    fn set_disk_size(&mut self, size: u64) -> Result<(), E>;
}
