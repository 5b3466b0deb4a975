//! # codec
//!
//! Lossless packing of 2-bit nucleotide codes into a byte-aligned stream, and the inverse.
//!
//! ## Usage
//!
//! ### Packing
//!
//! ```rust
//! use dnapack::codec::{self, PackWriter};
//!
//! // A=0, C=1, G=2, T=3
//! let symbols = [0u8, 1, 2, 3, 3, 2];
//!
//! // One-shot packing into memory
//! let packed = codec::pack(&symbols);
//! assert_eq!(packed, vec![0b0001_1011, 0b1110_0000]);
//!
//! // Streaming into any byte sink
//! let mut writer = PackWriter::new(Vec::new());
//! writer.write_symbols(&symbols).unwrap();
//! let sink = writer.finish().unwrap();
//! assert_eq!(sink, packed);
//! ```
//!
//! ### Unpacking
//!
//! The packed stream carries no length information, so the symbol count must be
//! known by the consumer.
//!
//! ```rust
//! use dnapack::codec;
//!
//! let packed = [0b0001_1011u8, 0b1110_0000];
//! let symbols = codec::decode(&packed[..], 6).unwrap();
//! assert_eq!(symbols, vec![0, 1, 2, 3, 3, 2]);
//! ```
//!
//! ## Packed format
//!
//! The file is a raw byte stream: no header, no magic number, no length field.
//!
//! | Bits | 7-6        | 5-4          | 3-2          | 1-0          |
//! | ---- | ---------- | ------------ | ------------ | ------------ |
//! | Byte `i` | symbol `4i` | symbol `4i+1` | symbol `4i+2` | symbol `4i+3` |
//!
//! A stream of `n` symbols is exactly `ceil(n / 4)` bytes long. When `n` is not a
//! multiple of four the unused low bits of the final byte are zero and carry no meaning.

mod mmap;
mod reader;
mod utils;
mod writer;

pub use mmap::PackedFile;
pub use reader::{decode, decode_slice, PackReader};
pub use utils::{packed_len, SYMBOLS_PER_BYTE};
pub use writer::{encode, pack, PackWriter};
