//! Nucleotide alphabet and its 2-bit codes
//!
//! Only the four canonical bases have a code. Every other byte, including the
//! ambiguity marker `N` and lowercase bases, is unrepresentable.

/// The ambiguity marker that disqualifies a read during filtering
pub const AMBIGUITY_MARKER: u8 = b'N';

/// A 2-bit nucleotide code
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}
impl Nucleotide {
    /// Translates an ASCII base into its code, or `None` for anything outside {A,C,G,T}
    #[must_use]
    pub fn from_ascii(base: u8) -> Option<Self> {
        match base {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    /// Builds a nucleotide from the low two bits of `code`
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    /// The 2-bit code of this nucleotide
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn to_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// Decodes a slice of 2-bit codes back into ASCII bases, appending to `buf`
pub fn codes_to_ascii(codes: &[u8], buf: &mut Vec<u8>) {
    buf.reserve(codes.len());
    buf.extend(
        codes
            .iter()
            .map(|&code| Nucleotide::from_code(code).to_ascii()),
    );
}
