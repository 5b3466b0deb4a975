//! Symbol packing
//!
//! Converts 2-bit symbol codes into packed bytes, four symbols per byte with the
//! first symbol in the most significant pair.

use std::io::Write;

use super::utils::{packed_len, shift_of, SYMBOLS_PER_BYTE};
use crate::error::Result;

/// Packs up to four symbols into a single byte, zero-filling missing slots
#[inline]
fn pack_group(group: &[u8]) -> u8 {
    debug_assert!(group.len() <= SYMBOLS_PER_BYTE);
    group
        .iter()
        .enumerate()
        .fold(0u8, |byte, (slot, &symbol)| {
            byte | ((symbol & 0x03) << shift_of(slot))
        })
}

/// Packs a full symbol slice into memory
///
/// The returned buffer is exactly [`packed_len`]`(symbols.len())` bytes long.
#[must_use]
pub fn pack(symbols: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(packed_len(symbols.len()));
    packed.extend(symbols.chunks(SYMBOLS_PER_BYTE).map(pack_group));
    packed
}

/// Packs `symbols` into `sink` and flushes it
///
/// Returns the number of bytes written.
pub fn encode<W: Write>(symbols: &[u8], sink: &mut W) -> Result<usize> {
    let mut writer = PackWriter::new(sink);
    writer.write_symbols(symbols)?;
    writer.finish()?;
    Ok(packed_len(symbols.len()))
}

/// Streaming symbol packer
///
/// Holds at most one partially filled byte. Completed bytes are handed to the
/// inner writer immediately, so callers that write to files should wrap them in a
/// [`std::io::BufWriter`].
///
/// Every symbol must be in `0..=3`; validating bases is the responsibility of the
/// caller. The pending byte is owned by the writer, so independent writers never
/// share state.
pub struct PackWriter<W: Write> {
    /// Inner writer
    inner: W,

    /// Partially filled byte
    pending: u8,

    /// Number of symbols already placed in `pending`
    slot: usize,

    /// Number of symbols accepted so far
    symbols_written: usize,
}
impl<W: Write> PackWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: 0,
            slot: 0,
            symbols_written: 0,
        }
    }

    /// Appends a single symbol
    pub fn write_symbol(&mut self, symbol: u8) -> Result<()> {
        debug_assert!(symbol < 4, "symbol out of range: {symbol}");
        self.pending |= (symbol & 0x03) << shift_of(self.slot);
        self.slot += 1;
        self.symbols_written += 1;
        if self.slot == SYMBOLS_PER_BYTE {
            self.emit()?;
        }
        Ok(())
    }

    /// Appends a slice of symbols
    pub fn write_symbols(&mut self, symbols: &[u8]) -> Result<()> {
        // realign to a byte boundary first
        let head = ((SYMBOLS_PER_BYTE - self.slot) % SYMBOLS_PER_BYTE).min(symbols.len());
        let (unaligned, rest) = symbols.split_at(head);
        unaligned
            .iter()
            .try_for_each(|&symbol| self.write_symbol(symbol))?;

        let mut groups = rest.chunks_exact(SYMBOLS_PER_BYTE);
        for group in groups.by_ref() {
            self.inner.write_all(&[pack_group(group)])?;
            self.symbols_written += SYMBOLS_PER_BYTE;
        }
        groups
            .remainder()
            .iter()
            .try_for_each(|&symbol| self.write_symbol(symbol))
    }

    fn emit(&mut self) -> Result<()> {
        self.inner.write_all(&[self.pending])?;
        self.pending = 0;
        self.slot = 0;
        Ok(())
    }

    /// Number of symbols accepted so far
    #[must_use]
    pub fn symbols_written(&self) -> usize {
        self.symbols_written
    }

    /// Writes the trailing partial byte (if any), flushes, and returns the inner writer
    pub fn finish(mut self) -> Result<W> {
        if self.slot > 0 {
            self.emit()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod testing {

    use super::*;
    use anyhow::Result;

    #[test]
    fn test_bit_layout() -> Result<()> {
        // A C G T -> 00 01 10 11
        assert_eq!(pack(&[0, 1, 2, 3]), vec![0b0001_1011]);
        // T A A A -> 11 00 00 00
        assert_eq!(pack(&[3, 0, 0, 0]), vec![0b1100_0000]);
        // a lone G keeps the low bits clear
        assert_eq!(pack(&[2]), vec![0b1000_0000]);
        Ok(())
    }

    #[test]
    fn test_empty() -> Result<()> {
        assert!(pack(&[]).is_empty());
        let writer = PackWriter::new(Vec::new());
        assert!(writer.finish()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_mixed_writes_match_pack() -> Result<()> {
        let symbols: Vec<u8> = (0..23).map(|i| (i * 7 % 4) as u8).collect();

        let mut writer = PackWriter::new(Vec::new());
        writer.write_symbol(symbols[0])?;
        writer.write_symbols(&symbols[1..6])?;
        writer.write_symbol(symbols[6])?;
        writer.write_symbols(&symbols[7..])?;
        assert_eq!(writer.symbols_written(), symbols.len());

        assert_eq!(writer.finish()?, pack(&symbols));
        Ok(())
    }

    #[test]
    fn test_encode_reports_length() -> Result<()> {
        let mut sink = Vec::new();
        let written = encode(&[1; 10], &mut sink)?;
        assert_eq!(written, 3);
        assert_eq!(sink, vec![0b0101_0101, 0b0101_0101, 0b0101_0000]);
        Ok(())
    }
}
