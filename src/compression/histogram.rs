//! Histogram header: the serialized frequency table at the front of every
//! encoded file.
//!
//! ```text
//! [flag][byte, VarCount(freq)]...[0x00]
//! ```
//!
//! Entries are listed in ascending frequency order. Byte value 0 doubles as
//! the terminator, so the leading flag byte says whether value 0 also
//! appears as a real entry. While the flag is set, a 0 is read as an entry
//! (and clears the flag); once it is clear, the next 0 ends the header.

use crate::compression::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::compression::varcount;
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

const TERMINATOR: u8 = 0x00;

/// Serializes `freqs` into header bytes.
///
/// Ties in frequency keep ascending byte order.
///
/// # Errors
///
/// [`Error::FrequencyOverflow`] if any count is 2^31 or larger. Nothing is
/// produced in that case.
pub fn serialize(freqs: &FrequencyTable) -> Result<Vec<u8>> {
    let mut entries: Vec<(u8, u64)> = freqs.iter().collect();
    entries.sort_by_key(|&(_, count)| count);

    let mut out = Vec::with_capacity(2 + entries.len() * 2);
    out.push(u8::from(freqs.get(0) > 0));
    for (byte, count) in entries {
        let encoded = u32::try_from(count)
            .map_err(|_| Error::CountOverflow(count))
            .and_then(varcount::encode)
            .map_err(|_| Error::FrequencyOverflow { byte, count })?;
        out.push(byte);
        out.extend_from_slice(encoded.as_bytes());
    }
    out.push(TERMINATOR);

    Ok(out)
}

/// Writes the header for `freqs` and returns the number of bytes written.
pub fn write_histogram<W: Write + ?Sized>(freqs: &FrequencyTable, writer: &mut W) -> Result<usize> {
    let header = serialize(freqs)?;
    log::trace!("histogram header: {}", hex::encode(&header));
    writer.write_all(&header)?;
    Ok(header.len())
}

/// Reads a header, leaving `reader` on the first payload byte.
///
/// # Errors
///
/// [`Error::TruncatedHistogram`] if the stream ends before the terminator;
/// [`Error::InvalidHistogram`] for a bad flag byte, a repeated byte value or
/// a zero frequency.
pub fn read_histogram<R: Read + ?Sized>(reader: &mut R) -> Result<FrequencyTable> {
    let mut flag = match read_byte(reader)? {
        0 => false,
        1 => true,
        other => {
            return Err(Error::InvalidHistogram(format!(
                "flag byte must be 0 or 1, found {other}"
            )))
        }
    };

    let mut table = FrequencyTable::new();
    let mut seen = [false; ALPHABET_SIZE];
    let mut byte = read_byte(reader)?;

    while flag || byte != TERMINATOR {
        let count = varcount::read_from(reader).map_err(truncated)?;
        if count == 0 {
            return Err(Error::InvalidHistogram(format!(
                "byte 0x{byte:02x} has a zero frequency"
            )));
        }
        if std::mem::replace(&mut seen[byte as usize], true) {
            return Err(Error::InvalidHistogram(format!(
                "byte 0x{byte:02x} is listed twice"
            )));
        }
        table.set(byte, u64::from(count));

        if byte == 0 {
            flag = false;
        }
        byte = read_byte(reader)?;
    }

    log::debug!(
        "read histogram: {} symbols, {} total",
        table.distinct(),
        table.total()
    );
    Ok(table)
}

fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|e| truncated(e.into()))?;
    Ok(buf[0])
}

fn truncated(err: Error) -> Error {
    match err {
        Error::Io(e) if e.kind() == ErrorKind::UnexpectedEof => Error::TruncatedHistogram,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(freqs: &FrequencyTable) -> FrequencyTable {
        let bytes = serialize(freqs).unwrap();
        let mut reader = bytes.as_slice();
        let decoded = read_histogram(&mut reader).unwrap();
        assert!(reader.is_empty(), "header reader left {} bytes", reader.len());
        decoded
    }

    #[test]
    fn test_empty_table() {
        let bytes = serialize(&FrequencyTable::new()).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00]);
        assert!(round_trip(&FrequencyTable::new()).is_empty());
    }

    #[test]
    fn test_layout_sorted_by_frequency() {
        let freqs = FrequencyTable::from_bytes(&[0x41, 0x41, 0x42, 0x43, 0x43, 0x43]);
        let bytes = serialize(&freqs).unwrap();
        assert_eq!(bytes, vec![0x00, 0x42, 1, 0x41, 2, 0x43, 3, 0x00]);
    }

    #[test]
    fn test_zero_byte_entry() {
        let freqs = FrequencyTable::from_bytes(&[0, 0, 0, 7]);
        let bytes = serialize(&freqs).unwrap();
        assert_eq!(bytes, vec![0x01, 0x07, 1, 0x00, 3, 0x00]);
        assert_eq!(round_trip(&freqs), freqs);
    }

    #[test]
    fn test_only_zero_byte() {
        let freqs = FrequencyTable::from_bytes(&[0; 10]);
        let bytes = serialize(&freqs).unwrap();
        assert_eq!(bytes, vec![0x01, 0x00, 10, 0x00]);
        assert_eq!(round_trip(&freqs), freqs);
    }

    #[test]
    fn test_random_tables_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut freqs = FrequencyTable::new();
            for byte in 0..=255u8 {
                if rng.gen_bool(0.3) {
                    freqs.set(byte, rng.gen_range(1..=u64::from(varcount::MAX_COUNT)));
                }
            }
            freqs.set(rng.gen(), 1);
            assert_eq!(round_trip(&freqs), freqs);
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut freqs = FrequencyTable::new();
        freqs.set(9, 3);
        freqs.set(200, 1 << 31);
        match serialize(&freqs) {
            Err(Error::FrequencyOverflow { byte, count }) => {
                assert_eq!(byte, 200);
                assert_eq!(count, 1 << 31);
            }
            other => panic!("expected overflow, got {other:?}"),
        }

        let mut sink = Vec::new();
        assert!(write_histogram(&freqs, &mut sink).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_truncation_is_detected() {
        let freqs = FrequencyTable::from_bytes(b"mississippi river");
        let bytes = serialize(&freqs).unwrap();
        for cut in 0..bytes.len() {
            let mut reader = &bytes[..cut];
            assert!(
                matches!(read_histogram(&mut reader), Err(Error::TruncatedHistogram)),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn test_duplicate_entry_is_rejected() {
        let bytes = [0x00, 0x41, 1, 0x41, 2, 0x00];
        assert!(matches!(
            read_histogram(&mut &bytes[..]),
            Err(Error::InvalidHistogram(_))
        ));
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        let bytes = [0x02, 0x00];
        assert!(matches!(
            read_histogram(&mut &bytes[..]),
            Err(Error::InvalidHistogram(_))
        ));
    }

    #[test]
    fn test_reader_stops_at_terminator() {
        let freqs = FrequencyTable::from_bytes(b"abc");
        let mut bytes = serialize(&freqs).unwrap();
        bytes.extend_from_slice(&[0xAA, 0x03]);
        let mut reader = bytes.as_slice();
        assert_eq!(read_histogram(&mut reader).unwrap(), freqs);
        assert_eq!(reader, &[0xAA, 0x03]);
    }
}
