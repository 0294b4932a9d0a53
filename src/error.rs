//! Error types shared by every stage of the codec.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while counting, encoding or decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A count does not fit in the 31 bits a VarCount can carry.
    #[error("count {0} cannot be represented (maximum is 2^31 - 1)")]
    CountOverflow(u64),

    /// A symbol frequency exceeds what the histogram format can store.
    #[error("frequency {count} of byte 0x{byte:02x} exceeds the histogram limit")]
    FrequencyOverflow { byte: u8, count: u64 },

    /// A VarCount byte sequence is malformed.
    #[error("invalid VarCount: {0}")]
    InvalidVarCount(String),

    /// The header ended before its terminator.
    #[error("histogram is truncated")]
    TruncatedHistogram,

    /// The header is readable but describes an impossible table.
    #[error("invalid histogram: {0}")]
    InvalidHistogram(String),

    /// The payload ran out of bits in the middle of a code word.
    #[error("code word truncated after {decoded} decoded bytes")]
    TruncatedCodeword { decoded: u64 },

    /// The payload walked into a branch the tree does not have.
    #[error("invalid code word after {decoded} decoded bytes")]
    InvalidCodeword { decoded: u64 },

    /// The trailing-bits terminator is out of range.
    #[error("invalid trailing-bits terminator {0}")]
    InvalidTerminator(u8),

    /// The payload decodes to more symbols than the histogram accounts for.
    #[error("payload holds more than the {expected} symbols in the histogram")]
    ExcessSymbols { expected: u64 },

    /// The second pass met a byte that the first pass never counted.
    #[error("byte 0x{0:02x} has no code; the input changed between passes")]
    MissingCode(u8),

    /// The second pass read a different number of bytes than the first.
    #[error("input changed between passes: counted {counted} bytes, encoded {encoded}")]
    InputChanged { counted: u64, encoded: u64 },

    /// A code word is longer than the configured limit.
    #[error("code for byte 0x{byte:02x} is {length} bits long, limit is {limit}")]
    CodeTooLong { byte: u8, length: usize, limit: usize },

    /// Popped from an empty priority queue.
    #[error("priority queue is empty")]
    EmptyHeap,

    /// Pushed into a full priority queue.
    #[error("priority queue is full")]
    HeapOverflow,
}

impl Error {
    /// True for the variants that can only come from malformed input.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidVarCount(_)
                | Error::TruncatedHistogram
                | Error::InvalidHistogram(_)
                | Error::TruncatedCodeword { .. }
                | Error::InvalidCodeword { .. }
                | Error::InvalidTerminator(_)
                | Error::ExcessSymbols { .. }
        )
    }
}
