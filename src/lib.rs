//! Two-pass static Huffman compression for arbitrary byte streams.
//!
//! An encoded file is a histogram header followed by the packed code bits and
//! a one-byte count of trailing padding bits. See [`compression`] for the
//! codec itself.

pub mod compression;
pub mod error;

pub use compression::{huffman_decode, huffman_encode, Compression, HuffmanCoder};
pub use error::{Error, Result};
