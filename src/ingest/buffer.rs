use crate::{error::IngestError, nucleotide::Nucleotide, Result};

/// Why a prefix could not be appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The prefix does not fit in the remaining capacity
    Full,
    /// A byte of the prefix has no 2-bit code
    InvalidBase { position: usize, base: u8 },
}

/// Append-only buffer of 2-bit symbol codes with a fixed capacity
///
/// The whole capacity is reserved up front and the buffer never grows past it.
#[derive(Debug)]
pub struct SymbolBuffer {
    symbols: Vec<u8>,
    capacity: usize,
}
impl SymbolBuffer {
    /// Reserves exactly `capacity` symbols
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::BufferAllocation`] if the memory cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut symbols = Vec::new();
        symbols
            .try_reserve_exact(capacity)
            .map_err(|_| IngestError::BufferAllocation(capacity))?;
        Ok(Self { symbols, capacity })
    }

    /// Translates `prefix` to symbol codes and appends them
    ///
    /// Either the whole prefix is appended or the buffer is left unchanged.
    pub fn push_prefix(&mut self, prefix: &[u8]) -> std::result::Result<(), PushError> {
        if prefix.len() > self.remaining() {
            return Err(PushError::Full);
        }

        let start = self.symbols.len();
        for (position, &base) in prefix.iter().enumerate() {
            if let Some(nuc) = Nucleotide::from_ascii(base) {
                self.symbols.push(nuc.code());
            } else {
                self.symbols.truncate(start);
                return Err(PushError::InvalidBase { position, base });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.symbols.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.symbols.len() == self.capacity
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.symbols
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.symbols
    }
}
