//! Single node in a tree
//!
//! A node owns its label and its ordered children, so a subtree is a plain
//! value: dropping a node drops everything below it, and a node can never
//! appear twice in the same tree.

use std::fmt;

use super::visitor::Visitor;

/// One vertex of a rooted, finite tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Label of the current node.
    label: String,

    /// Ordered children; order is traversal-significant.
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with the given label and children.
    pub fn with_children(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Append a new child after the existing ones.
    pub fn add_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    /// Label of this node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Iterate over the children in their defined order.
    pub fn children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if leaf (no children).
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in the subtree rooted here (including this node).
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_size).sum::<usize>()
    }

    /// Deterministic, node-local textual identity used to verify traversals.
    ///
    /// Derived from this node's own content only, never from descendants.
    pub fn debug_string(&self) -> String {
        self.label.clone()
    }

    /// Pre-order traversal entry point.
    ///
    /// Visits this node first, then each child subtree in child order, so
    /// every node reachable from here is visited exactly once, parents
    /// before descendants.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit(self);
        for child in &self.children {
            child.accept(visitor);
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
