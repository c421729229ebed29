//! Visitor pattern for navigating a tree
//!
//! `TreeNode::accept` drives the traversal; a visitor decides what happens
//! at each node. The tree never learns what the operation does, and the
//! visitor never mutates the tree it walks.

use super::node::TreeNode;

/// A per-node operation invoked once per node during a pre-order traversal.
///
/// Implementations must not retain the node reference beyond the call.
pub trait Visitor {
    /// Called by [`TreeNode::accept`] exactly once per visited node.
    fn visit(&mut self, node: &TreeNode);
}

/// Any `FnMut(&TreeNode)` closure is a visitor.
impl<F: FnMut(&TreeNode)> Visitor for F {
    fn visit(&mut self, node: &TreeNode) {
        self(node)
    }
}

/// Accumulating visitor: records the debug identity of every node it
/// visits, in visitation order.
///
/// After a complete traversal the log holds exactly one entry per node of
/// the tree, parents before descendants, siblings in child order.
#[derive(Debug, Default)]
pub struct TraversalLog {
    entries: Vec<String>,
}

impl TraversalLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries accumulated so far, in visitation order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of nodes visited so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first visit.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the log, yielding the accumulated entries.
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

impl Visitor for TraversalLog {
    fn visit(&mut self, node: &TreeNode) {
        self.entries.push(node.debug_string());
    }
}
