//! VarCount: a self-delimiting variable-length encoding for symbol counts.
//!
//! The layout is the 1993 UTF-8 multibyte scheme, which carries up to 31 bits
//! of payload in 1 to 6 bytes:
//!
//! ```text
//! bytes  payload  layout
//!   1      7      0xxxxxxx
//!   2     11      110xxxxx 10xxxxxx
//!   3     16      1110xxxx 10xxxxxx 10xxxxxx
//!   4     21      11110xxx 10xxxxxx 10xxxxxx 10xxxxxx
//!   5     26      111110xx 10xxxxxx ... (4 continuation bytes)
//!   6     31      1111110x 10xxxxxx ... (5 continuation bytes)
//! ```
//!
//! The number of leading one bits in the first byte gives the total length,
//! so a reader never needs an explicit size field. Continuation groups are
//! stored most significant first.

use crate::error::{Error, Result};
use std::io::Read;

/// Largest count a VarCount can carry.
pub const MAX_COUNT: u32 = (1 << 31) - 1;

/// Longest encoding, in bytes.
pub const MAX_LEN: usize = 6;

/// An encoded count: up to six bytes stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarCount {
    bytes: [u8; MAX_LEN],
    len: u8,
}

impl VarCount {
    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of encoded bytes (1..=6).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; an encoding holds at least one byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for VarCount {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encodes `count`.
///
/// # Errors
///
/// Returns [`Error::CountOverflow`] when `count` is 2^31 or larger.
///
/// # Example
///
/// ```
/// use huffcode::compression::varcount;
///
/// assert_eq!(varcount::encode(0x41).unwrap().as_bytes(), &[0x41]);
/// assert_eq!(varcount::encode(0x80).unwrap().as_bytes(), &[0xC2, 0x80]);
/// assert!(varcount::encode(1 << 31).is_err());
/// ```
pub fn encode(count: u32) -> Result<VarCount> {
    if count > MAX_COUNT {
        return Err(Error::CountOverflow(u64::from(count)));
    }

    let mut out = VarCount {
        bytes: [0; MAX_LEN],
        len: 1,
    };

    if count < 0x80 {
        out.bytes[0] = count as u8;
        return Ok(out);
    }

    // An n-byte encoding holds (7 - n) + 6 * (n - 1) = 5n + 1 payload bits.
    let n = (2..=MAX_LEN)
        .find(|&n| u64::from(count) < 1u64 << (5 * n + 1))
        .ok_or(Error::CountOverflow(u64::from(count)))?;

    let lead = (0xFFu32 << (8 - n)) as u8;
    out.bytes[0] = lead | (count >> (6 * (n - 1))) as u8;
    for i in 1..n {
        let group = (count >> (6 * (n - 1 - i))) & 0x3F;
        out.bytes[i] = 0x80 | group as u8;
    }
    out.len = n as u8;

    Ok(out)
}

/// Total encoding length announced by a first byte.
///
/// The leading one bits are capped at six. A single leading one marks a
/// continuation byte and cannot start an encoding.
pub fn encoded_len(first: u8) -> Result<usize> {
    match first.leading_ones() as usize {
        0 => Ok(1),
        1 => Err(Error::InvalidVarCount(format!(
            "0x{first:02x} is a continuation byte, not a first byte"
        ))),
        n => Ok(n.min(MAX_LEN)),
    }
}

/// Decodes exactly one VarCount occupying all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<u32> {
    let (&first, rest) = bytes
        .split_first()
        .ok_or_else(|| Error::InvalidVarCount("empty input".to_string()))?;

    let n = encoded_len(first)?;
    if bytes.len() != n {
        return Err(Error::InvalidVarCount(format!(
            "first byte 0x{first:02x} announces {n} bytes, got {}",
            bytes.len()
        )));
    }
    if n == 1 {
        return Ok(u32::from(first));
    }

    let mut value = u32::from(first & (0x7F >> n));
    for &byte in rest {
        if byte & 0xC0 != 0x80 {
            return Err(Error::InvalidVarCount(format!(
                "0x{byte:02x} is not a continuation byte"
            )));
        }
        value = (value << 6) | u32::from(byte & 0x3F);
    }

    Ok(value)
}

/// Reads one VarCount from `reader`.
///
/// A short read surfaces as [`Error::Io`] with
/// [`std::io::ErrorKind::UnexpectedEof`]; callers decide what that means.
pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; MAX_LEN];
    reader.read_exact(&mut buf[..1])?;
    let n = encoded_len(buf[0])?;
    reader.read_exact(&mut buf[1..n])?;
    decode(&buf[..n])
}
