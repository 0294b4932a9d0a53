//! A bit window with append-at-high-end / remove-at-low-end semantics.
//!
//! Bits are packed into bytes least significant bit first: the earliest bit
//! pushed becomes bit 0 of the next byte popped. The window grows without
//! bound, which is what lets codes of any length pass through it.

use crate::compression::huffman::Code;
use bitvec::prelude::*;

/// Consumed bits are dropped from storage once this many pile up.
const COMPACT_THRESHOLD: usize = 1 << 15;

#[derive(Debug, Default, Clone)]
pub struct BitBuffer {
    bits: BitVec<u8, Lsb0>,
    head: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        BitBuffer {
            bits: BitVec::new(),
            head: 0,
        }
    }

    /// Number of buffered bits.
    pub fn len(&self) -> usize {
        self.bits.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends a code, first (root-side) bit first.
    pub fn push_code(&mut self, code: &Code) {
        self.bits.extend(code.bits().iter().by_vals());
    }

    /// Appends all eight bits of `byte`, least significant first.
    pub fn push_byte(&mut self, byte: u8) {
        self.bits.extend_from_bitslice(byte.view_bits::<Lsb0>());
    }

    /// Removes the lowest buffered bit.
    pub fn pop_bit(&mut self) -> Option<bool> {
        if self.head >= self.bits.len() {
            return None;
        }
        let bit = self.bits[self.head];
        self.head += 1;
        self.compact();
        Some(bit)
    }

    /// Removes the lowest eight bits as a byte, if eight are buffered.
    pub fn pop_byte(&mut self) -> Option<u8> {
        if self.len() < 8 {
            return None;
        }
        let byte = self.low_bits_as_byte(8);
        self.head += 8;
        self.compact();
        Some(byte)
    }

    /// Removes whatever is left (fewer than eight bits) as a zero-padded
    /// byte, returning it with the number of real bits it holds.
    pub fn take_partial_byte(&mut self) -> Option<(u8, usize)> {
        let n = self.len();
        if n == 0 || n >= 8 {
            return None;
        }
        let byte = self.low_bits_as_byte(n);
        self.bits.clear();
        self.head = 0;
        Some((byte, n))
    }

    /// Drops `n` bits from the high end.
    pub fn discard_high(&mut self, n: usize) {
        let keep = self.bits.len().saturating_sub(n).max(self.head);
        self.bits.truncate(keep);
    }

    fn low_bits_as_byte(&self, n: usize) -> u8 {
        self.bits[self.head..self.head + n]
            .iter()
            .by_vals()
            .enumerate()
            .fold(0u8, |acc, (i, bit)| acc | (u8::from(bit) << i))
    }

    fn compact(&mut self) {
        if self.head >= COMPACT_THRESHOLD {
            self.bits = self.bits[self.head..].to_bitvec();
            self.head = 0;
        }
    }
}
