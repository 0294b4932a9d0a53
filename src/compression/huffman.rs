use crate::compression::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::compression::min_heap::MinHeap;
use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf holds a byte value and its frequency.
    Leaf { byte: u8, weight: u64 },
    /// An internal node weighs as much as its children together.
    ///
    /// `right` is `None` only for the root of a single-symbol tree.
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Option<Box<HuffmanNode>>,
    },
}

impl HuffmanNode {
    /// Returns the weight of the node.
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// The child reached by following `bit` (false = left, true = right).
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    Some(&**left)
                }
            }
        }
    }
}

/// A Huffman tree over byte values.
///
/// Encoder and decoder both build the tree from the same frequency table
/// with the same heap, so they always agree on every code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Builds the tree for `freqs`.
    ///
    /// Returns `None` when every count is zero: there is nothing to encode.
    /// A table with one nonzero entry yields a root whose only child is that
    /// leaf, so the symbol still gets the one-bit code `0`.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Option<Self>> {
        let mut heap = MinHeap::new();
        for (byte, weight) in freqs.iter() {
            heap.insert(weight, HuffmanNode::Leaf { byte, weight })?;
        }

        match heap.len() {
            0 => return Ok(None),
            1 => {
                let (weight, leaf) = heap.pop_min()?;
                return Ok(Some(HuffmanTree {
                    root: HuffmanNode::Internal {
                        weight,
                        left: Box::new(leaf),
                        right: None,
                    },
                }));
            }
            _ => {}
        }

        // Combine the two lightest nodes until only one tree remains.
        while heap.len() > 1 {
            let (left_weight, left) = heap.pop_min()?;
            let (right_weight, right) = heap.pop_min()?;
            let weight = left_weight + right_weight;
            let internal = HuffmanNode::Internal {
                weight,
                left: Box::new(left),
                right: Some(Box::new(right)),
            };
            heap.insert(weight, internal)?;
        }
        let (_, root) = heap.pop_min()?;

        let tree = HuffmanTree { root };
        log::debug!(
            "built huffman tree: {} leaves, weight {}, max depth {}",
            tree.leaf_count(),
            tree.weight(),
            tree.max_depth()
        );
        log::trace!("huffman tree: {:?}", tree.root);
        Ok(Some(tree))
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Total weight, equal to the number of encoded symbols.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Number of distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.nodes().filter(|(node, _)| node.is_leaf()).count()
    }

    /// Length of the longest code in the tree.
    pub fn max_depth(&self) -> usize {
        self.nodes()
            .filter(|(node, _)| node.is_leaf())
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0)
    }

    /// Every node with its depth, depth-first.
    fn nodes(&self) -> impl Iterator<Item = (&HuffmanNode, usize)> + '_ {
        let mut stack = vec![(&self.root, 0usize)];
        std::iter::from_fn(move || {
            let (node, depth) = stack.pop()?;
            if let HuffmanNode::Internal { left, right, .. } = node {
                if let Some(right) = right {
                    stack.push((&**right, depth + 1));
                }
                stack.push((&**left, depth + 1));
            }
            Some((node, depth))
        })
    }

    /// Derives the code table for this tree.
    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }
}

/// A Huffman code: the root-to-leaf path, first step first.
///
/// A `0` bit means "go left", a `1` bit means "go right". Codes have no fixed
/// width limit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<&str> for Code {
    /// Parses a `0`/`1` string; any other character counts as `1`.
    fn from(s: &str) -> Self {
        Code {
            bits: s.chars().map(|c| c != '0').collect(),
        }
    }
}

/// Maps each byte value to its code. Bytes that never occur have no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl Default for CodeTable {
    /// A table with no codes, for empty input.
    fn default() -> Self {
        CodeTable {
            codes: vec![None; ALPHABET_SIZE],
        }
    }
}

impl CodeTable {
    /// Walks the tree depth-first, appending 0 for each left step and 1 for
    /// each right step, and records the path at every leaf.
    ///
    /// The walk uses an explicit stack and a single shared path buffer, so
    /// deep trees cannot exhaust the call stack.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        let mut path: BitVec<u8, Msb0> = BitVec::new();
        let mut stack: Vec<(&HuffmanNode, usize, bool)> = Vec::new();

        match tree.root() {
            HuffmanNode::Leaf { byte, .. } => {
                codes[*byte as usize] = Some(Code::from("0"));
            }
            HuffmanNode::Internal { left, right, .. } => {
                if let Some(right) = right {
                    stack.push((&**right, 0, true));
                }
                stack.push((&**left, 0, false));
            }
        }

        while let Some((node, depth, bit)) = stack.pop() {
            path.truncate(depth);
            path.push(bit);
            match node {
                HuffmanNode::Leaf { byte, .. } => {
                    codes[*byte as usize] = Some(Code { bits: path.clone() });
                }
                HuffmanNode::Internal { left, right, .. } => {
                    debug_assert!(right.is_some(), "only the root may have one child");
                    if let Some(right) = right {
                        stack.push((&**right, path.len(), true));
                    }
                    stack.push((&**left, path.len(), false));
                }
            }
        }

        CodeTable { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes[byte as usize].as_ref()
    }

    /// `(byte, code)` for every byte that has a code, ascending by byte.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(b, code)| code.as_ref().map(|c| (b as u8, c)))
    }

    /// Number of bytes with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Payload size in bits for input with these frequencies.
    pub fn weighted_bits(&self, freqs: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(b, c)| freqs.get(b) * c.len() as u64)
            .sum()
    }

    /// Fails if any code is longer than `limit` bits.
    pub fn check_max_len(&self, limit: usize) -> Result<()> {
        match self.iter().find(|(_, c)| c.len() > limit) {
            Some((byte, code)) => Err(Error::CodeTooLong {
                byte,
                length: code.len(),
                limit,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn table_of(pairs: &[(u8, u64)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for &(b, c) in pairs {
            t.set(b, c);
        }
        t
    }

    fn check_weights(node: &HuffmanNode) -> u64 {
        match node {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, left, right } => {
                let sum = check_weights(left) + right.as_deref().map_or(0, check_weights);
                assert_eq!(*weight, sum);
                sum
            }
        }
    }

    #[test]
    fn test_empty_table_builds_nothing() {
        assert!(HuffmanTree::from_frequencies(&FrequencyTable::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let tree = HuffmanTree::from_frequencies(&table_of(&[(b'z', 7)]))
            .unwrap()
            .unwrap();
        match tree.root() {
            HuffmanNode::Internal { weight, left, right } => {
                assert_eq!(*weight, 7);
                assert_eq!(**left, HuffmanNode::Leaf { byte: b'z', weight: 7 });
                assert!(right.is_none());
            }
            leaf => panic!("expected degenerate internal root, got {leaf:?}"),
        }
        let table = tree.code_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'z').unwrap().to_string(), "0");
    }

    #[test]
    fn test_concrete_scenario() {
        let freqs = FrequencyTable::from_bytes(&[0x41, 0x41, 0x42, 0x43]);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        let table = tree.code_table();
        assert_eq!(table.get(0x41).unwrap().len(), 1);
        assert_eq!(table.get(0x42).unwrap().len(), 2);
        assert_eq!(table.get(0x43).unwrap().len(), 2);
        assert_eq!(table.weighted_bits(&freqs), 6);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_weights_sum_up() {
        let freqs = FrequencyTable::from_bytes(b"this is an example for huffman encoding");
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        assert_eq!(check_weights(tree.root()), freqs.total());
        assert_eq!(tree.weight(), freqs.total());
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let freqs = FrequencyTable::from_bytes(b"huffman coding in rust is fun!");
        let table = HuffmanTree::from_frequencies(&freqs)
            .unwrap()
            .unwrap()
            .code_table();
        let codes: Vec<_> = table.iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(codes.len(), freqs.distinct());
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let freqs = table_of(&[(1, 5), (2, 5), (3, 5), (4, 5), (5, 10), (6, 10)]);
        let a = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        let b = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.code_table(), b.code_table());
    }

    /// Minimum of sum(f * len) over every length vector satisfying Kraft's
    /// inequality; any such vector is realisable as a prefix code.
    fn brute_force_cost(freqs: &[u64]) -> u64 {
        let n = freqs.len();
        let max_len = (n - 1) as u32;
        let mut lens = vec![1u32; n];
        let mut best = u64::MAX;
        loop {
            let kraft: u64 = lens.iter().map(|&l| 1u64 << (max_len - l)).sum();
            if kraft <= 1u64 << max_len {
                let cost: u64 = freqs.iter().zip(&lens).map(|(&f, &l)| f * l as u64).sum();
                best = best.min(cost);
            }
            let mut i = 0;
            while i < n && lens[i] == max_len {
                lens[i] = 1;
                i += 1;
            }
            if i == n {
                break;
            }
            lens[i] += 1;
        }
        best
    }

    #[test]
    fn test_optimal_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 2..=6usize {
            for _ in 0..20 {
                let weights: Vec<u64> = (0..n).map(|_| rng.gen_range(1..50)).collect();
                let mut freqs = FrequencyTable::new();
                for (i, &w) in weights.iter().enumerate() {
                    freqs.set((i * 37) as u8, w);
                }
                let table = HuffmanTree::from_frequencies(&freqs)
                    .unwrap()
                    .unwrap()
                    .code_table();
                assert_eq!(
                    table.weighted_bits(&freqs),
                    brute_force_cost(&weights),
                    "weights {weights:?}"
                );
            }
        }
    }

    #[test]
    fn test_fibonacci_weights_exceed_word_width() {
        let mut freqs = FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for byte in 0..70u8 {
            freqs.set(byte, a);
            (a, b) = (b, a + b);
        }
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap().unwrap();
        let table = tree.code_table();
        assert_eq!(table.max_len(), tree.max_depth());
        assert!(table.max_len() > 64);
        assert!(matches!(
            table.check_max_len(64),
            Err(Error::CodeTooLong { limit: 64, .. })
        ));
        assert!(table.check_max_len(table.max_len()).is_ok());
    }

    #[test]
    fn test_code_display_round_trip() {
        let code = Code::from("0110");
        assert_eq!(code.len(), 4);
        assert_eq!(code.to_string(), "0110");
    }
}
