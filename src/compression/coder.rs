//! Top-level encode and decode operations.
//!
//! Encoding makes two passes over a seekable input: one to count byte
//! frequencies and one, after an explicit rewind, to emit codes. Decoding
//! reads the histogram, rebuilds the same tree and unpacks the payload in a
//! single pass.

use crate::compression::frequency::FrequencyTable;
use crate::compression::huffman::{CodeTable, HuffmanTree};
use crate::compression::stats::{DecodeStats, EncodeStats};
use crate::compression::{decoder, encoder, histogram, Compression};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Default size of the read and write buffers.
pub const DEFAULT_IO_BUFFER_SIZE: usize = 64 * 1024;

/// Settings for a [`HuffmanCoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoderConfig {
    /// Capacity of the buffered reader and writer wrapped around the streams.
    pub io_buffer_size: usize,
    /// Longest code the coder accepts, in bits. `None` means no limit.
    pub max_code_length: Option<usize>,
}

impl Default for CoderConfig {
    fn default() -> Self {
        CoderConfig {
            io_buffer_size: DEFAULT_IO_BUFFER_SIZE,
            max_code_length: None,
        }
    }
}

impl CoderConfig {
    pub fn with_io_buffer_size(mut self, size: usize) -> Self {
        self.io_buffer_size = size.max(1);
        self
    }

    pub fn with_max_code_length(mut self, limit: Option<usize>) -> Self {
        self.max_code_length = limit;
        self
    }
}

/// Two-pass Huffman coder over byte streams.
///
/// # Example
///
/// ```
/// use huffcode::compression::{Compression, HuffmanCoder};
///
/// let coder = HuffmanCoder::default();
/// let packed = coder.compress(b"abracadabra").unwrap();
/// assert_eq!(coder.decompress(&packed).unwrap(), b"abracadabra");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HuffmanCoder {
    config: CoderConfig,
}

impl HuffmanCoder {
    pub fn new(config: CoderConfig) -> Self {
        HuffmanCoder { config }
    }

    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    fn check_code_lengths(&self, codes: &CodeTable) -> Result<()> {
        match self.config.max_code_length {
            Some(limit) => codes.check_max_len(limit),
            None => Ok(()),
        }
    }

    /// Encodes all of `input` into `output`.
    ///
    /// `input` is read from its start twice; the header is only written once
    /// the frequencies are known to fit the format.
    pub fn encode_stream<R, W>(&self, input: &mut R, output: &mut W) -> Result<EncodeStats>
    where
        R: Read + Seek + ?Sized,
        W: Write + ?Sized,
    {
        let cap = self.config.io_buffer_size;

        input.seek(SeekFrom::Start(0))?;
        let freqs = {
            let mut counter = BufReader::with_capacity(cap, &mut *input);
            FrequencyTable::from_reader(&mut counter)?
        };
        log::debug!(
            "pass 1: {} bytes, {} distinct values",
            freqs.total(),
            freqs.distinct()
        );

        let codes = HuffmanTree::from_frequencies(&freqs)?
            .map(|tree| tree.code_table())
            .unwrap_or_default();
        self.check_code_lengths(&codes)?;

        let mut writer = BufWriter::with_capacity(cap, output);
        let header_bytes = histogram::write_histogram(&freqs, &mut writer)?;

        input.seek(SeekFrom::Start(0))?;
        let payload = encoder::encode_payload(
            &codes,
            &mut BufReader::with_capacity(cap, &mut *input),
            &mut writer,
        )?;
        writer.flush()?;

        if payload.symbols != freqs.total() {
            return Err(Error::InputChanged {
                counted: freqs.total(),
                encoded: payload.symbols,
            });
        }

        let stats = EncodeStats::new(&freqs, &codes, header_bytes, payload);
        log::info!(
            "encoded {} bytes into {} ({} header, {} payload)",
            stats.input_bytes,
            stats.output_bytes(),
            stats.header_bytes,
            stats.payload_bytes
        );
        Ok(stats)
    }

    /// Decodes an encoded stream from its current position into `output`.
    pub fn decode_stream<R, W>(&self, input: &mut R, output: &mut W) -> Result<DecodeStats>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let cap = self.config.io_buffer_size;
        let mut reader = BufReader::with_capacity(cap, input);
        let mut writer = BufWriter::with_capacity(cap, output);

        let freqs = histogram::read_histogram(&mut reader)?;
        let header_bytes = histogram::serialize(&freqs)?.len() as u64;

        let payload = match HuffmanTree::from_frequencies(&freqs)? {
            Some(tree) => {
                self.check_code_lengths(&tree.code_table())?;
                decoder::decode_payload(&tree, &mut reader, &mut writer)?
            }
            None => decoder::expect_empty_payload(&mut reader)?,
        };
        writer.flush()?;

        let stats = DecodeStats {
            header_bytes,
            payload_bytes: payload.bytes,
            output_bytes: payload.symbols,
            code_words: freqs.distinct(),
        };
        log::info!(
            "decoded {} bytes into {}",
            stats.input_bytes(),
            stats.output_bytes
        );
        Ok(stats)
    }

    /// Encodes the file at `input` into a new file at `output`.
    pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<EncodeStats> {
        let mut src = File::open(input.as_ref())?;
        let mut dst = File::create(output.as_ref())?;
        self.encode_stream(&mut src, &mut dst)
    }

    /// Decodes the file at `input` into a new file at `output`.
    pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<DecodeStats> {
        let mut src = File::open(input.as_ref())?;
        let mut dst = File::create(output.as_ref())?;
        self.decode_stream(&mut src, &mut dst)
    }
}

impl Compression for HuffmanCoder {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_stream(&mut Cursor::new(data), &mut out)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode_stream(&mut Cursor::new(data), &mut out)?;
        Ok(out)
    }
}

/// Convenience function: encodes `data` with the default configuration.
pub fn huffman_encode(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCoder::default().compress(data)
}

/// Convenience function: decodes `data` with the default configuration.
pub fn huffman_decode(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCoder::default().decompress(data)
}
