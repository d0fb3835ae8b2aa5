use std::collections::BTreeMap;
use std::fmt;

use bitstream_io::{
    huffman::{compile_write_tree, WriteHuffmanTree},
    BigEndian,
};
use tracing::debug;

use crate::{
    error::Result,
    frequency::FrequencyTable,
    tree::{HuffmanTree, Node},
};

/// A variable-length code, one `0` or `1` per element, first bit first.
///
/// This is the bit layout `bitstream_io::huffman` compiles its trees from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code {
    bits: Vec<u8>,
}

impl Code {
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Self {
            bits: text.bytes().map(|b| (b == b'1') as u8).collect(),
        }
    }
}

/// Code of every leaf byte in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();

        match tree.root() {
            // A lone leaf has no path to describe it, so it gets the code `0`.
            Node::Leaf { byte, .. } => {
                codes.insert(*byte, Code { bits: vec![0] });
            }
            root => traverse(root, &mut Vec::new(), 0, &mut codes),
        }

        debug!(codes = codes.len(), "generated code table");
        Self { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(&byte, code)| (byte, code))
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut codes = self.codes.values().collect::<Vec<_>>();
        codes.sort();
        // In sorted order a prefix always sits directly before one of its extensions.
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    /// Number of bits needed to encode an input with these counts.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .symbols()
            .map(|(byte, count)| {
                let len = self.get(byte).map_or(0, Code::len);
                count as u64 * len as u64
            })
            .sum()
    }

    pub fn to_write_tree(&self) -> Result<WriteHuffmanTree<BigEndian, u8>> {
        let values = self
            .codes
            .iter()
            .map(|(&byte, code)| (byte, code.bits.clone()))
            .collect::<Vec<_>>();
        Ok(compile_write_tree::<BigEndian, u8>(values)?)
    }
}

fn traverse(node: &Node, code: &mut Vec<u8>, depth: usize, codes: &mut BTreeMap<u8, Code>) {
    match node {
        Node::Leaf { byte, .. } => {
            codes.insert(
                *byte,
                Code {
                    bits: code[..depth].to_vec(),
                },
            );
        }
        Node::Internal { left, right, .. } => {
            code.truncate(depth);
            code.push(0);
            traverse(left, code, depth + 1, codes);

            code.truncate(depth);
            code.push(1);
            traverse(right, code, depth + 1, codes);
        }
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (byte, code) in &self.codes {
            writeln!(f, "{byte}\t{code}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(input: &[u8]) -> (FrequencyTable, CodeTable) {
        let frequencies = FrequencyTable::from_bytes(input).unwrap();
        let tree = HuffmanTree::build(&frequencies).unwrap();
        (frequencies, CodeTable::from_tree(&tree))
    }

    #[test]
    fn test_two_symbol_codes() {
        let (frequencies, table) = table_of(b"aaab");
        assert_eq!(table.get(b'b'), Some(&Code::from("0")));
        assert_eq!(table.get(b'a'), Some(&Code::from("1")));
        assert_eq!(table.get(b'c'), None);
        assert_eq!(table.encoded_bits(&frequencies), 4);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let (frequencies, table) = table_of(&[0x41; 100]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x41), Some(&Code::from("0")));
        assert_eq!(table.encoded_bits(&frequencies), 100);
    }

    #[test]
    fn test_three_symbol_codes() {
        let (frequencies, table) = table_of(b"aaaabbc");
        assert_eq!(table.get(b'c'), Some(&Code::from("00")));
        assert_eq!(table.get(b'b'), Some(&Code::from("01")));
        assert_eq!(table.get(b'a'), Some(&Code::from("1")));
        assert_eq!(table.encoded_bits(&frequencies), 4 + 2 * 2 + 2);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let text = b"It was the best of times, it was the worst of times, \
                     it was the age of wisdom, it was the age of foolishness";
        let (_, table) = table_of(text);
        assert!(table.is_prefix_free());

        let (_, table) = table_of(&(0..=255u8).collect::<Vec<_>>());
        assert_eq!(table.len(), 256);
        assert!(table.is_prefix_free());
        assert!(table.iter().all(|(_, code)| code.len() == 8));
    }

    #[test]
    fn test_prefix_check_detects_overlap() {
        let mut codes = BTreeMap::new();
        codes.insert(1, Code::from("01"));
        codes.insert(2, Code::from("011"));
        codes.insert(3, Code::from("1"));
        assert!(!CodeTable { codes }.is_prefix_free());
    }

    #[test]
    fn test_kraft_sum_is_one() {
        let (_, table) = table_of(b"abracadabra, a magic word of no particular meaning");
        let max = table.iter().map(|(_, code)| code.len()).max().unwrap();
        let sum: u64 = table.iter().map(|(_, code)| 1u64 << (max - code.len())).sum();
        assert_eq!(sum, 1u64 << max);
    }

    #[test]
    fn test_display_lists_codes() {
        let (_, table) = table_of(b"aaab");
        assert_eq!(table.to_string(), "97\t1\n98\t0\n");
    }

    #[test]
    fn test_write_tree_compiles() {
        let (_, table) = table_of(b"hello, huffman");
        assert!(table.to_write_tree().is_ok());
    }
}
