//! Huffman compression of arbitrary byte streams.
//!
//! This module provides the pieces of a two-pass, static Huffman codec:
//! - Frequency counting over a seekable input
//! - Code construction with a bounded min-heap
//! - A self-describing histogram header built from VarCounts
//! - Bit-level payload packing and unpacking
//!
//! # Examples
//!
//! ```rust
//! use huffcode::compression::{huffman_decode, huffman_encode};
//!
//! let packed = huffman_encode(&[0x41, 0x41, 0x42, 0x43]).unwrap();
//! assert_eq!(packed, [0x00, 0x42, 1, 0x43, 1, 0x41, 2, 0x00, 0x34, 0x02]);
//! assert_eq!(huffman_decode(&packed).unwrap(), [0x41, 0x41, 0x42, 0x43]);
//! ```

pub use crate::error::Result;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// What one payload pass produced or consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadSummary {
    /// Bytes of original data.
    pub symbols: u64,
    /// Payload bytes on the wire, terminator included.
    pub bytes: u64,
    /// Code bits, padding excluded.
    pub bits: u64,
}

pub mod bit_buffer;
pub mod coder;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod histogram;
pub mod huffman;
pub mod min_heap;
pub mod stats;
pub mod varcount;

pub use coder::{huffman_decode, huffman_encode, CoderConfig, HuffmanCoder};
pub use frequency::FrequencyTable;
pub use huffman::{Code, CodeTable, HuffmanNode, HuffmanTree};
pub use stats::{DecodeStats, EncodeStats, SymbolStats};
