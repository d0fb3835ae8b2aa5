use std::cmp::Ordering;

use tracing::debug;

use crate::{
    error::{Error, Result},
    frequency::{FrequencyTable, SYMBOLS},
    min_heap::MinHeap,
};

/// Upper bound on live nodes while building: 256 leaves plus 255 merges.
pub const MAX_NODES: usize = 2 * SYMBOLS - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Queue entry ordered by `(weight, order)`.
///
/// Leaves take their byte value as `order`, merged nodes take `256 + k` for the
/// k-th merge, so equal weights always resolve the same way and the tree is a
/// function of the frequency table alone.
struct QueueEntry {
    weight: u64,
    order: u16,
    node: Node,
}

impl QueueEntry {
    fn leaf(byte: u8, count: u32) -> Self {
        let weight = count as u64;
        Self {
            weight,
            order: byte as u16,
            node: Node::Leaf { byte, weight },
        }
    }

    // The first extracted entry becomes the left (0) child.
    fn merge(left: Self, right: Self, order: u16) -> Self {
        let weight = left.weight + right.weight;
        Self {
            weight,
            order,
            node: Node::Internal {
                weight,
                left: Box::new(left.node),
                right: Box::new(right.node),
            },
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.order.cmp(&other.order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree greedily from every byte with a nonzero count.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut queue = MinHeap::with_capacity(MAX_NODES);
        for (byte, count) in frequencies.symbols() {
            queue.insert(QueueEntry::leaf(byte, count))?;
        }

        if queue.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        let mut order = SYMBOLS as u16;
        while queue.len() > 1 {
            let left = queue.extract_min()?;
            let right = queue.extract_min()?;
            queue.insert(QueueEntry::merge(left, right, order))?;
            order += 1;
        }

        let tree = Self {
            root: queue.extract_min()?.node,
        };

        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.weight(),
            "built huffman tree"
        );
        Ok(tree)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Sum of all leaf weights.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    pub fn internal_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path. Zero for a single leaf.
    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    pub fn walker(&self) -> TreeWalker<'_> {
        TreeWalker {
            root: &self.root,
            current: &self.root,
        }
    }
}

/// Walks the tree one bit at a time: 0 goes left, 1 goes right.
pub struct TreeWalker<'a> {
    root: &'a Node,
    current: &'a Node,
}

impl<'a> TreeWalker<'a> {
    /// Consumes one bit and returns the byte if a leaf was reached, after which
    /// the walk restarts at the root.
    pub fn step(&mut self, bit: bool) -> Result<Option<u8>> {
        let current: &'a Node = self.current;
        match current {
            // Only reachable when the root itself is a leaf, whose code is `0`.
            Node::Leaf { byte, .. } => match bit {
                false => Ok(Some(*byte)),
                true => Err(Error::corrupt("bit 1 in a single-symbol stream")),
            },
            Node::Internal { left, right, .. } => {
                let next: &'a Node = if bit { &**right } else { &**left };
                match next {
                    Node::Leaf { byte, .. } => {
                        self.current = self.root;
                        Ok(Some(*byte))
                    }
                    Node::Internal { .. } => {
                        self.current = next;
                        Ok(None)
                    }
                }
            }
        }
    }

    /// True when no partial code is pending.
    pub fn at_root(&self) -> bool {
        std::ptr::eq(self.current, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(input: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_bytes(input).unwrap()).unwrap()
    }

    fn fibonacci_counts(symbols: usize) -> FrequencyTable {
        let mut counts = [0; SYMBOLS];
        let (mut a, mut b) = (1u32, 1u32);
        for count in counts.iter_mut().take(symbols) {
            *count = a;
            (a, b) = (b, a + b);
        }
        FrequencyTable::from_counts(counts)
    }

    #[test]
    fn test_two_symbols() {
        let tree = tree_of(b"aaab");
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.internal_count(), 1);
        assert_eq!(tree.weight(), 4);

        // `b` has the lower weight, so it is extracted first and goes left.
        match tree.root() {
            Node::Internal { left, right, .. } => {
                assert_eq!(**left, Node::Leaf { byte: b'b', weight: 1 });
                assert_eq!(**right, Node::Leaf { byte: b'a', weight: 3 });
            }
            node => panic!("expected internal root, got {node:?}"),
        }
    }

    #[test]
    fn test_leaf_and_internal_counts() {
        for k in 1..=SYMBOLS {
            let input = (0..k).map(|b| b as u8).collect::<Vec<_>>();
            let tree = tree_of(&input);
            assert_eq!(tree.leaf_count(), k);
            assert_eq!(tree.internal_count(), k - 1);
        }
    }

    #[test]
    fn test_single_symbol_root_is_leaf() {
        let tree = tree_of(&[b'z'; 100]);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_empty_alphabet() {
        let result = HuffmanTree::build(&FrequencyTable::new());
        assert!(matches!(result, Err(Error::EmptyAlphabet)));
    }

    #[test]
    fn test_equal_weights_are_deterministic() {
        let input = (0..=255u8).collect::<Vec<_>>();
        let first = tree_of(&input);
        let second = tree_of(&input);
        assert_eq!(first, second);
        // 256 equal weights form a perfectly balanced tree.
        assert_eq!(first.depth(), 8);
    }

    #[test]
    fn test_fibonacci_weights_are_skewed() {
        let tree = HuffmanTree::build(&fibonacci_counts(20)).unwrap();
        assert_eq!(tree.leaf_count(), 20);
        assert_eq!(tree.depth(), 19);
    }

    #[test]
    fn test_walker() {
        let tree = tree_of(b"aaab");
        let mut walker = tree.walker();
        assert_eq!(walker.step(true).unwrap(), Some(b'a'));
        assert_eq!(walker.step(false).unwrap(), Some(b'b'));
        assert!(walker.at_root());
    }

    #[test]
    fn test_walker_pending_code() {
        let tree = tree_of(b"aaaabbc");
        let mut walker = tree.walker();
        // c and b merge first, so their codes are two bits long.
        assert_eq!(walker.step(false).unwrap(), None);
        assert!(!walker.at_root());
        assert!(walker.step(true).unwrap().is_some());
        assert!(walker.at_root());
    }

    #[test]
    fn test_walker_single_symbol() {
        let tree = tree_of(b"qqq");
        let mut walker = tree.walker();
        assert_eq!(walker.step(false).unwrap(), Some(b'q'));
        assert!(walker.at_root());
        assert!(matches!(walker.step(true), Err(Error::CorruptStream(_))));
    }
}
