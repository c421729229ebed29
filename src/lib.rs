//! # Minimum-Cost Tree-to-Tree Correction
//!
//! This library computes the minimum-cost transformation between two
//! labeled, ordered trees, after Kuo-Chung Tai's "The Tree-to-Tree
//! Correction Problem" (JACM 26(3), 1979).
//!
//! ## Components
//!
//! 1. **Tree core**: owned-node trees traversed pre-order through the
//!    visitor pattern ([`TreeNode::accept`] / [`Visitor`])
//! 2. **Preorder index**: [`Tree`] assigns 1-based preorder positions and
//!    answers ancestry queries in them
//! 3. **Correction**: [`compute_diff`] runs the Tai dynamic programs and
//!    returns distance plus the mapping behind it
//! 4. **Surfaces**: YAML tree descriptions in, edit scripts and Graphviz
//!    dot out
//!
//! ## Usage Example
//!
//! ```
//! use treediff::{diff_trees, Tree, TreeNode};
//!
//! let source = Tree::new(TreeNode::new("A"));
//! let target = Tree::new(TreeNode::with_children("A", vec![TreeNode::new("B")]));
//!
//! let report = diff_trees(&source, &target)?;
//! assert_eq!(report.distance, 1);
//! # Ok::<(), treediff::tree::PositionError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod diff; // Tai 1979 correction algorithm
pub mod input; // YAML tree descriptions
pub mod render; // Graphviz dot output
pub mod tree; // Tree structure and visitor traversal

// Re-exports for convenience
pub use diff::{compute_diff, compute_distance, Diff, EditOp, MappedPair};
pub use input::trees_from_yaml;
pub use render::render_dot;
pub use tree::{TraversalLog, Tree, TreeNode, Visitor};

use serde::Serialize;

use tree::PositionError;

/// Everything a caller usually wants from one correction run: the
/// distance, the raw mapping, and the human-readable edit script.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    /// Minimum transformation cost.
    pub distance: u32,

    /// Mapping achieving the distance (see [`MappedPair`]).
    pub mapping: Vec<MappedPair>,

    /// The mapping expanded into edit operations.
    pub operations: Vec<EditOp>,
}

/// Diff two trees and bundle distance, mapping and edit script.
pub fn diff_trees(source: &Tree, target: &Tree) -> Result<DiffReport, PositionError> {
    let diff = compute_diff(source, target);
    let operations = diff.edit_script(source, target)?;
    Ok(DiffReport {
        distance: diff.distance,
        mapping: diff.mapping,
        operations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_bundles_script_with_mapping() {
        let source = Tree::new(TreeNode::with_children("A", vec![TreeNode::new("B")]));
        let target = Tree::new(TreeNode::with_children("A", vec![TreeNode::new("C")]));

        let report = diff_trees(&source, &target).expect("diff succeeds");
        assert_eq!(report.distance, 1);
        assert_eq!(report.mapping.len(), report.operations.len());
        assert!(report
            .operations
            .iter()
            .any(|op| matches!(op, EditOp::Change { .. })));
    }
}
