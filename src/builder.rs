use crate::alphabet::FrequencyTable;
use crate::tree::{CodeTree, Node, NodeId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Errors that can occur while building a code tree
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BuildError {
    #[error("No symbol has a non-zero count")]
    EmptyAlphabet,
    #[error("Combined symbol counts do not fit in 64 bits")]
    WeightOverflow,
}

/// Build an optimal prefix code tree for the given symbol counts.
///
/// Symbols with a count of zero are left out of the tree. If exactly one
/// symbol is present the result is a single leaf with an empty code.
///
/// Nodes are merged lowest weight first. Equal weights are broken by creation
/// order: leaves are created in ascending symbol order, and every merged node
/// is newer than all nodes created before it. Of each merged pair, the node
/// removed first becomes the left child.
pub fn build(frequencies: &FrequencyTable) -> Result<CodeTree, BuildError> {
    let mut nodes = Vec::new();
    // Arena indices double as creation order, which makes ties deterministic
    let mut queue = BinaryHeap::new();

    for (symbol, count) in frequencies.present() {
        queue.push(Reverse((count, NodeId(nodes.len()))));
        nodes.push(Node::Leaf(symbol));
    }

    log::debug!("Building code tree over {} symbols", nodes.len());

    loop {
        let Some(Reverse((weight, left))) = queue.pop() else {
            return Err(BuildError::EmptyAlphabet);
        };
        let Some(Reverse((other_weight, right))) = queue.pop() else {
            log::debug!(
                "Built code tree with {} nodes, total weight {weight}",
                nodes.len()
            );
            return Ok(CodeTree::from_parts(nodes, left));
        };

        let combined = weight
            .checked_add(other_weight)
            .ok_or(BuildError::WeightOverflow)?;
        log::trace!("Merging {left:?} ({weight}) and {right:?} ({other_weight})");

        queue.push(Reverse((combined, NodeId(nodes.len()))));
        nodes.push(Node::Internal { left, right });
    }
}
