/// A record with a fixed on-disk encoding.
pub trait ByteSerializable {
    type BytesArrayType;

    fn to_bytes(&self) -> Self::BytesArrayType;
    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized;
    /// The number of bytes the record occupies on disk.
    fn serialized_size() -> usize;
}
