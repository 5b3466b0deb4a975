/// Number of 2-bit symbols held by one packed byte
pub const SYMBOLS_PER_BYTE: usize = 4;

/// Calculates the number of bytes required to pack `num_symbols` symbols
///
/// # Examples
///
/// ```
/// use dnapack::codec::packed_len;
///
/// assert_eq!(packed_len(0), 0);
/// assert_eq!(packed_len(4), 1);
/// assert_eq!(packed_len(5), 2);
/// ```
#[must_use]
pub fn packed_len(num_symbols: usize) -> usize {
    num_symbols.div_ceil(SYMBOLS_PER_BYTE)
}

/// Bit shift of the `slot`-th symbol (0..4) inside its byte
#[inline]
pub(crate) fn shift_of(slot: usize) -> u32 {
    6 - 2 * slot as u32
}
