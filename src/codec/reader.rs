//! Symbol unpacking
//!
//! The packed stream carries no length, so every reader is created with the exact
//! number of symbols to recover.

use std::io::{ErrorKind, Read};

use super::utils::{packed_len, shift_of, SYMBOLS_PER_BYTE};
use crate::error::{ReadError, Result};

/// Decodes `count` symbols from a packed byte source
///
/// # Errors
///
/// Returns [`ReadError::Truncated`] if the source ends before `ceil(count / 4)` bytes
/// were read.
pub fn decode<R: Read>(source: R, count: usize) -> Result<Vec<u8>> {
    let mut symbols = Vec::with_capacity(count);
    for symbol in PackReader::new(source, count) {
        symbols.push(symbol?);
    }
    Ok(symbols)
}

/// Decodes `count` symbols from an in-memory packed buffer
///
/// Bytes beyond `ceil(count / 4)` are ignored.
pub fn decode_slice(packed: &[u8], count: usize) -> Result<Vec<u8>> {
    let expected = packed_len(count);
    if packed.len() < expected {
        return Err(ReadError::Truncated {
            expected,
            found: packed.len(),
        }
        .into());
    }

    let mut symbols = Vec::with_capacity(expected * SYMBOLS_PER_BYTE);
    for &byte in &packed[..expected] {
        symbols.extend_from_slice(&[
            (byte >> 6) & 0x03,
            (byte >> 4) & 0x03,
            (byte >> 2) & 0x03,
            byte & 0x03,
        ]);
    }
    symbols.truncate(count);
    Ok(symbols)
}

/// Lazy symbol decoder over any byte source
///
/// One byte is read from the source only after the four symbols of the previous
/// byte have been yielded. The iterator is fused after an error.
#[derive(Debug)]
pub struct PackReader<R: Read> {
    inner: R,

    /// Symbols still to be produced
    remaining: usize,

    /// Byte currently being unpacked
    current: u8,

    /// Next slot of `current` to yield, a full byte means a fresh read is required
    slot: usize,

    /// Bytes consumed from the source
    bytes_read: usize,

    /// Bytes required for the requested symbol count
    expected: usize,
}
impl<R: Read> PackReader<R> {
    pub fn new(inner: R, count: usize) -> Self {
        Self {
            inner,
            remaining: count,
            current: 0,
            slot: SYMBOLS_PER_BYTE,
            bytes_read: 0,
            expected: packed_len(count),
        }
    }

    /// Symbols not yet produced
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn next_byte(&mut self) -> Result<()> {
        let mut buf = [0u8; 1];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.current = buf[0];
                self.slot = 0;
                self.bytes_read += 1;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(ReadError::Truncated {
                expected: self.expected,
                found: self.bytes_read,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
impl<R: Read> Iterator for PackReader<R> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        if self.slot == SYMBOLS_PER_BYTE {
            if let Err(e) = self.next_byte() {
                self.remaining = 0;
                return Some(Err(e));
            }
        }

        let symbol = (self.current >> shift_of(self.slot)) & 0x03;
        self.slot += 1;
        self.remaining -= 1;
        Some(Ok(symbol))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod testing {

    use std::io::Cursor;

    use super::*;
    use anyhow::Result;

    #[test]
    fn test_bit_layout() -> Result<()> {
        let decoded = decode(Cursor::new([0b0001_1011u8, 0b1100_0000]), 5)?;
        assert_eq!(decoded, vec![0, 1, 2, 3, 3]);
        Ok(())
    }

    #[test]
    fn test_reads_lazily() -> Result<()> {
        let mut reader = PackReader::new(Cursor::new(vec![0b0001_1011u8, 0xFF]), 8);
        for expected in [0, 1, 2, 3] {
            assert_eq!(reader.next().transpose()?, Some(expected));
        }
        assert_eq!(reader.remaining(), 4);
        // the second byte has not been touched yet
        assert_eq!(reader.into_inner().position(), 1);
        Ok(())
    }

    #[test]
    fn test_zero_count() -> Result<()> {
        assert!(decode(Cursor::new(Vec::<u8>::new()), 0)?.is_empty());
        assert!(decode_slice(&[], 0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_fused_after_truncation() {
        let mut reader = PackReader::new(Cursor::new(Vec::<u8>::new()), 3);
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_trailing_bytes_ignored() -> Result<()> {
        let packed = [0b1110_0100u8, 0xAA, 0xAA];
        assert_eq!(decode_slice(&packed, 3)?, vec![3, 2, 1]);
        assert_eq!(decode(&packed[..], 3)?, vec![3, 2, 1]);
        Ok(())
    }
}
