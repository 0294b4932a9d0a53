//! Statistics reported after encoding or decoding.
//!
//! Nothing here affects the bytes produced; these values exist for display.

use crate::compression::frequency::FrequencyTable;
use crate::compression::huffman::CodeTable;
use crate::compression::PayloadSummary;
use std::fmt;

/// One row of the code table report.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStats {
    pub byte: u8,
    pub count: u64,
    /// Share of the input, in `[0, 1]`.
    pub probability: f64,
    /// The code as a `0`/`1` string.
    pub code: String,
}

/// Summary of one encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub header_bytes: u64,
    /// Packed code bytes plus the terminator.
    pub payload_bytes: u64,
    pub payload_bits: u64,
    pub symbols: Vec<SymbolStats>,
}

impl EncodeStats {
    pub fn new(
        freqs: &FrequencyTable,
        codes: &CodeTable,
        header_bytes: usize,
        payload: PayloadSummary,
    ) -> Self {
        let total = freqs.total();
        let symbols = codes
            .iter()
            .map(|(byte, code)| {
                let count = freqs.get(byte);
                SymbolStats {
                    byte,
                    count,
                    probability: ratio(count, total),
                    code: code.to_string(),
                }
            })
            .collect();

        EncodeStats {
            input_bytes: payload.symbols,
            header_bytes: header_bytes as u64,
            payload_bytes: payload.bytes,
            payload_bits: payload.bits,
            symbols,
        }
    }

    /// Number of distinct code words.
    pub fn code_words(&self) -> usize {
        self.symbols.len()
    }

    /// Size of the encoded file.
    pub fn output_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }

    /// Bytes spent on anything but code bits: header, padding and terminator.
    pub fn overhead_bytes(&self) -> u64 {
        self.output_bytes() - self.payload_bits / 8
    }

    /// Encoded size over input size; 0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.output_bytes(), self.input_bytes)
    }

    /// Shannon entropy of the input in bits per symbol.
    pub fn entropy(&self) -> f64 {
        self.symbols
            .iter()
            .filter(|s| s.probability > 0.0)
            .map(|s| -s.probability * s.probability.log2())
            .sum()
    }

    /// Expected code length in bits per symbol.
    pub fn average_code_len(&self) -> f64 {
        self.symbols
            .iter()
            .map(|s| s.probability * s.code.len() as f64)
            .sum()
    }
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6}  {:>10}  {:>9}  code", "byte", "count", "prob %")?;
        for s in &self.symbols {
            writeln!(
                f,
                "  0x{:02x}  {:>10}  {:>9.4}  {}",
                s.byte,
                s.count,
                s.probability * 100.0,
                s.code
            )?;
        }
        writeln!(f, "input bytes:        {}", self.input_bytes)?;
        writeln!(f, "code words:         {}", self.code_words())?;
        writeln!(f, "header bytes:       {}", self.header_bytes)?;
        writeln!(f, "payload bytes:      {}", self.payload_bytes)?;
        writeln!(f, "output bytes:       {}", self.output_bytes())?;
        writeln!(f, "overhead bytes:     {}", self.overhead_bytes())?;
        writeln!(f, "entropy:            {:.4} bits/symbol", self.entropy())?;
        writeln!(f, "average code len:   {:.4} bits/symbol", self.average_code_len())?;
        write!(f, "compression ratio:  {:.2}%", self.compression_ratio() * 100.0)
    }
}

/// Summary of one decode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub header_bytes: u64,
    pub payload_bytes: u64,
    pub output_bytes: u64,
    pub code_words: usize,
}

impl DecodeStats {
    pub fn input_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "input bytes:   {}", self.input_bytes())?;
        writeln!(f, "code words:    {}", self.code_words)?;
        write!(f, "output bytes:  {}", self.output_bytes)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
