use crate::alphabet::{FrequencyTable, Symbol};
use biterator::Bit;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Index of a node within a [`CodeTree`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A terminal node carrying one symbol of the alphabet.
    Leaf(Symbol),
    /// A merge of two subtrees. Zero bits descend left, one bits descend right.
    Internal { left: NodeId, right: NodeId },
}

/// A strict binary tree whose leaves carry symbols. The path from the root to
/// a leaf is that leaf's code.
///
/// Nodes live in a single arena and refer to their children by index, so the
/// tree is built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CodeTree {
    /// Assemble a tree from an arena and the index of its root. Callers are
    /// responsible for every `Internal` node referring to nodes in the arena.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root.0 < nodes.len());
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.0]
    }

    /// The node reached by following a single bit from `id`, or `None` if `id`
    /// is a leaf.
    pub fn child(&self, id: NodeId, bit: Bit) -> Option<NodeId> {
        match (self.node(id), bit) {
            (Node::Leaf(_), _) => None,
            (Node::Internal { left, .. }, Bit::Zero) => Some(left),
            (Node::Internal { right, .. }, Bit::One) => Some(right),
        }
    }

    /// True if the whole tree is one leaf with no internal ancestor. Its only
    /// code is the empty path.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.node(self.root), Node::Leaf(_))
    }

    /// The total number of nodes, internal nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk the leaves in pre-order (every left subtree before its sibling),
    /// yielding each leaf's symbol and code.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: vec![(self.root, Code::new())],
        }
    }

    /// Map from every symbol in the tree to its code.
    pub fn code_table(&self) -> BTreeMap<Symbol, Code> {
        self.leaves().collect()
    }

    /// The code of a single symbol, if the tree contains it.
    pub fn code(&self, symbol: Symbol) -> Option<Code> {
        self.leaves()
            .find(|(leaf, _)| *leaf == symbol)
            .map(|(_, code)| code)
    }

    /// Sum over all symbols of `code length * count`. Symbols absent from the
    /// tree contribute nothing.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        self.leaves()
            .map(|(symbol, code)| code.len() as u64 * frequencies.count(symbol))
            .sum()
    }
}

/// Pre-order iterator over the leaves of a [`CodeTree`].
pub struct Leaves<'t> {
    tree: &'t CodeTree,
    stack: Vec<(NodeId, Code)>,
}

impl Iterator for Leaves<'_> {
    type Item = (Symbol, Code);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, code)) = self.stack.pop() {
            match self.tree.node(id) {
                Node::Leaf(symbol) => return Some((symbol, code)),
                Node::Internal { left, right } => {
                    // Right goes on first so the left subtree is visited first
                    self.stack.push((right, code.extended(Bit::One)));
                    self.stack.push((left, code.extended(Bit::Zero)));
                }
            }
        }
        None
    }
}

/// The path from the root of a tree to one of its leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    // true = One
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push(&mut self, bit: Bit) {
        self.bits.push(bit == Bit::One);
    }

    /// A copy of this code with one more bit on the end.
    pub fn extended(&self, bit: Bit) -> Self {
        let mut code = self.clone();
        code.push(bit);
        code
    }

    /// The bit at `index`, counted from the root.
    pub fn bit(&self, index: usize) -> Option<Bit> {
        self.bits.get(index).map(|&one| to_bit(one))
    }

    pub fn bits(&self) -> impl Iterator<Item = Bit> + '_ {
        self.bits.iter().map(|&one| to_bit(one))
    }

    /// True if `self` is a (not necessarily proper) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

fn to_bit(one: bool) -> Bit {
    if one { Bit::One } else { Bit::Zero }
}

impl FromIterator<Bit> for Code {
    fn from_iter<I: IntoIterator<Item = Bit>>(iter: I) -> Self {
        let mut code = Code::new();
        for bit in iter {
            code.push(bit);
        }
        code
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &one in &self.bits {
            f.write_str(if one { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Errors that can occur while parsing a textual code
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CodeParseError {
    #[error("Invalid character {character:?} at position {position}, expected '0' or '1'")]
    InvalidCharacter { character: char, position: usize },
}

impl FromStr for Code {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, character)| match character {
                '0' => Ok(Bit::Zero),
                '1' => Ok(Bit::One),
                _ => Err(CodeParseError::InvalidCharacter {
                    character,
                    position,
                }),
            })
            .collect()
    }
}
