use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::reader::{decode_slice, PackReader};
use super::utils::packed_len;
use crate::error::{ReadError, Result};

/// A memory-mapped packed file with a known symbol count
///
/// The size of the file is validated against the symbol count when it is opened,
/// so decoding a `PackedFile` never hits a truncation error.
#[derive(Debug)]
pub struct PackedFile {
    /// Memory mapped file contents
    mmap: Mmap,

    /// Number of symbols stored in the file
    count: usize,
}
impl PackedFile {
    /// Maps the packed file at `path` holding `count` symbols
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be opened
    /// * The file is not a regular file
    /// * The file holds fewer than `ceil(count / 4)` bytes
    pub fn open<P: AsRef<Path>>(path: P, count: usize) -> Result<Self> {
        // Verify input file is a file before attempting to map
        let file = File::open(path)?;
        if !file.metadata()?.is_file() {
            return Err(ReadError::IncompatibleFile.into());
        }

        // Safety: the file is open and won't be modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };

        let expected = packed_len(count);
        if mmap.len() < expected {
            return Err(ReadError::Truncated {
                expected,
                found: mmap.len(),
            }
            .into());
        }

        Ok(Self { mmap, count })
    }

    /// Number of symbols stored in the file
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The packed bytes covering the stored symbols
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..packed_len(self.count)]
    }

    /// Unpacks every symbol into memory
    pub fn decode_all(&self) -> Result<Vec<u8>> {
        decode_slice(&self.mmap, self.count)
    }

    /// Lazily unpacks the symbols in order
    pub fn symbols(&self) -> PackReader<&[u8]> {
        PackReader::new(self.as_bytes(), self.count)
    }
}
