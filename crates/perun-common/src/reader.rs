//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`SpanReader`], a cursor-like type that reads
//! binary data from a byte slice without copying.

use byteorder::{ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// The reader maintains a position and hands out sub-slices of the
/// underlying buffer; all multi-byte integers are little-endian.
///
/// # Example
///
/// ```
/// use perun_common::SpanReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = SpanReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u32().unwrap(), 0x08070605);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SpanReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SpanReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Advance the position by a number of bytes.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_bytes(8).map(LittleEndian::read_u64)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Peek at a u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        self.peek_bytes(4).map(LittleEndian::read_u32)
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut reader = SpanReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = SpanReader::new(&data);

        assert_eq!(reader.peek_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_expect_magic() {
        let data = b"DDS \x01\x00\x00\x00";
        let mut reader = SpanReader::new(data);

        assert!(reader.expect_magic(b"DDS ").is_ok());
        assert_eq!(reader.read_u32().unwrap(), 1);

        let mut reader = SpanReader::new(data);
        assert!(matches!(
            reader.expect_magic(b"KTX2"),
            Err(Error::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = SpanReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }
}
