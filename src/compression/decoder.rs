//! Payload decoding: walks the Huffman tree bit by bit to recover the
//! original bytes.
//!
//! The final byte of the payload is the trailing-bits terminator, which is
//! only recognisable once the stream ends. The decoder therefore always
//! holds one byte of lookahead back from the bit buffer, and when the stream
//! runs dry it treats that held byte as the padding count.

use crate::compression::bit_buffer::BitBuffer;
use crate::compression::huffman::{HuffmanNode, HuffmanTree};
use crate::compression::PayloadSummary;
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

const OUTPUT_CHUNK: usize = 8 * 1024;

/// Bits that may still turn out to be padding once the terminator shows up.
const MAX_PADDING: usize = 7;

/// Decodes the payload that follows the histogram for `tree`.
///
/// The tree's total weight is the number of symbols the payload must hold.
///
/// # Errors
///
/// - [`Error::TruncatedCodeword`] if the bits run out mid-code or fewer
///   symbols than expected are found.
/// - [`Error::InvalidCodeword`] if a bit leads to a branch the tree lacks.
/// - [`Error::InvalidTerminator`] if the padding count is above 7.
/// - [`Error::ExcessSymbols`] if the payload holds more symbols than expected.
pub fn decode_payload<R, W>(
    tree: &HuffmanTree,
    reader: &mut R,
    writer: &mut W,
) -> Result<PayloadSummary>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut decoder = Decoder::new(tree, writer);

    let first = next_byte(reader)?.ok_or(Error::TruncatedCodeword { decoded: 0 })?;
    let mut lookahead = next_byte(reader)?.ok_or(Error::TruncatedCodeword { decoded: 0 })?;
    decoder.buffer.push_byte(first);
    decoder.summary.bytes = 2;
    decoder.summary.bits = 8;

    // Only start a walk when a whole code fits in the buffer without
    // touching bits that could still be padding.
    let low_water = tree.max_depth() - 1 + MAX_PADDING;

    loop {
        match next_byte(reader)? {
            Some(next) => {
                decoder.buffer.push_byte(lookahead);
                decoder.summary.bytes += 1;
                decoder.summary.bits += 8;
                lookahead = next;
                decoder.drain(low_water)?;
            }
            None => {
                let padding = lookahead;
                if usize::from(padding) > MAX_PADDING || usize::from(padding) > decoder.buffer.len() {
                    return Err(Error::InvalidTerminator(padding));
                }
                decoder.buffer.discard_high(usize::from(padding));
                decoder.summary.bits -= u64::from(padding);
                decoder.drain(0)?;
                break;
            }
        }
    }

    decoder.finish()
}

/// Consumes the payload of an empty file, which is a lone zero terminator.
pub fn expect_empty_payload<R: Read + ?Sized>(reader: &mut R) -> Result<PayloadSummary> {
    match next_byte(reader)? {
        None => Err(Error::TruncatedCodeword { decoded: 0 }),
        Some(0) => match next_byte(reader)? {
            None => Ok(PayloadSummary {
                symbols: 0,
                bytes: 1,
                bits: 0,
            }),
            Some(_) => Err(Error::ExcessSymbols { expected: 0 }),
        },
        Some(padding) => Err(Error::InvalidTerminator(padding)),
    }
}

struct Decoder<'a, W: Write + ?Sized> {
    root: &'a HuffmanNode,
    node: &'a HuffmanNode,
    expected: u64,
    buffer: BitBuffer,
    output: Vec<u8>,
    writer: &'a mut W,
    summary: PayloadSummary,
}

impl<'a, W: Write + ?Sized> Decoder<'a, W> {
    fn new(tree: &'a HuffmanTree, writer: &'a mut W) -> Self {
        Decoder {
            root: tree.root(),
            node: tree.root(),
            expected: tree.weight(),
            buffer: BitBuffer::new(),
            output: Vec::with_capacity(OUTPUT_CHUNK),
            writer,
            summary: PayloadSummary::default(),
        }
    }

    /// Decodes symbols while more than `floor` bits are buffered.
    fn drain(&mut self, floor: usize) -> Result<()> {
        while self.buffer.len() > floor {
            while !self.node.is_leaf() {
                let decoded = self.summary.symbols;
                let bit = self
                    .buffer
                    .pop_bit()
                    .ok_or(Error::TruncatedCodeword { decoded })?;
                self.node = self
                    .node
                    .child(bit)
                    .ok_or(Error::InvalidCodeword { decoded })?;
            }
            if let HuffmanNode::Leaf { byte, .. } = *self.node {
                self.emit(byte)?;
            }
            self.node = self.root;
        }
        Ok(())
    }

    fn emit(&mut self, byte: u8) -> Result<()> {
        if self.summary.symbols == self.expected {
            return Err(Error::ExcessSymbols {
                expected: self.expected,
            });
        }
        self.summary.symbols += 1;
        self.output.push(byte);
        if self.output.len() >= OUTPUT_CHUNK {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    fn finish(mut self) -> Result<PayloadSummary> {
        self.writer.write_all(&self.output)?;
        self.output.clear();

        if self.summary.symbols < self.expected {
            return Err(Error::TruncatedCodeword {
                decoded: self.summary.symbols,
            });
        }
        log::debug!(
            "decoded {} symbols from {} bits, {} payload bytes",
            self.summary.symbols,
            self.summary.bits,
            self.summary.bytes
        );
        Ok(self.summary)
    }
}

fn next_byte<R: Read + ?Sized>(reader: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
