//! Second encoding pass: replaces every input byte with its code and packs
//! the codes into bytes.
//!
//! Codes are laid down back to back, each one root-side bit first, and the
//! resulting bit sequence is cut into bytes least significant bit first. The
//! last byte of the payload is not data: it says how many high bits of the
//! byte before it are padding.

use crate::compression::bit_buffer::BitBuffer;
use crate::compression::huffman::CodeTable;
use crate::compression::PayloadSummary;
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

const CHUNK: usize = 8 * 1024;

/// Encodes everything `reader` yields and writes the packed payload,
/// including the trailing-bits terminator, to `writer`.
///
/// # Errors
///
/// [`Error::MissingCode`] if `reader` yields a byte with no code, plus any
/// I/O failure on either side.
pub fn encode_payload<R, W>(
    codes: &CodeTable,
    reader: &mut R,
    writer: &mut W,
) -> Result<PayloadSummary>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = BitBuffer::new();
    let mut summary = PayloadSummary::default();
    let mut input = [0u8; CHUNK];
    let mut output = Vec::with_capacity(CHUNK);

    loop {
        let n = match reader.read(&mut input) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        for &byte in &input[..n] {
            let code = codes.get(byte).ok_or(Error::MissingCode(byte))?;
            buffer.push_code(code);
            summary.bits += code.len() as u64;
            while let Some(packed) = buffer.pop_byte() {
                output.push(packed);
            }
        }
        summary.symbols += n as u64;

        writer.write_all(&output)?;
        summary.bytes += output.len() as u64;
        output.clear();
    }

    // Flush the partial byte, then record how many of its bits are padding.
    let terminator = match buffer.take_partial_byte() {
        Some((packed, used)) => {
            output.push(packed);
            (8 - used) as u8
        }
        None => 0,
    };
    output.push(terminator);
    writer.write_all(&output)?;
    summary.bytes += output.len() as u64;

    log::debug!(
        "encoded {} symbols into {} bits, {} payload bytes",
        summary.symbols,
        summary.bits,
        summary.bytes
    );
    Ok(summary)
}
