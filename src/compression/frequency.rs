//! Byte frequency tables and the counting pass that fills them.

use crate::error::Result;
use std::fmt;
use std::io::{ErrorKind, Read};

/// Number of distinct byte values.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count for each of the 256 byte values.
///
/// Counts are kept as `u64` so counting never overflows; the histogram
/// format enforces its own 31-bit ceiling when the table is serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Counts every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add_bytes(data);
        table
    }

    /// Counts every byte `reader` yields until end of stream.
    ///
    /// Interrupted reads are retried; any other read failure aborts.
    pub fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.add_bytes(&buf[..n]);
        }
        log::trace!("byte frequencies: {:?}", table);
        Ok(table)
    }

    fn add_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
    }

    /// Count for one byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Overwrites the count for one byte value.
    pub fn set(&mut self, byte: u8, count: u64) {
        self.counts[byte as usize] = count;
    }

    /// Sum of all counts: the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(byte, count)` for every nonzero count, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }
}

impl From<[u64; ALPHABET_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPHABET_SIZE]) -> Self {
        FrequencyTable { counts }
    }
}
