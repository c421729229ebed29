//! Tree structure and preorder position index
//!
//! [`TreeNode`] and [`Visitor`] form the traversal core; [`Tree`] takes
//! ownership of a finished node tree and indexes it by preorder position
//! (1-based), which is the coordinate system the correction algorithm in
//! [`crate::diff`] works in.

mod node;
mod visitor;

pub use node::TreeNode;
pub use visitor::{TraversalLog, Visitor};

use std::fmt::Write as _;

use thiserror::Error;

/// Errors raised by position-based lookups on a [`Tree`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    /// The requested preorder position does not name a node of this tree.
    #[error("no node at preorder position {0}")]
    OutOfRange(usize),

    /// The node at the given position has no father (it is the root).
    #[error("node at preorder position {0} has no father")]
    NoFather(usize),
}

/// What the index remembers about one node: enough to answer label and
/// ancestry queries without walking the owned tree again.
#[derive(Debug, Clone)]
struct PreorderEntry {
    label: String,
    father: Option<usize>,
}

/// A rooted tree indexed by preorder position.
///
/// Positions run from 1 (the root) to `size()` in pre-order. The index is
/// built once at construction; the tree is structurally immutable from then
/// on, so positions can never go stale.
#[derive(Debug, Clone)]
pub struct Tree {
    root: TreeNode,
    index: Vec<PreorderEntry>,
}

impl Tree {
    /// Take ownership of a finished node tree and index it.
    pub fn new(root: TreeNode) -> Self {
        let mut indexer = PreorderIndexer::default();
        root.accept(&mut indexer);
        Self {
            root,
            index: indexer.entries,
        }
    }

    /// The root node.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Label of the node at the given preorder position.
    pub fn label_at(&self, position: usize) -> Result<&str, PositionError> {
        Ok(&self.entry(position)?.label)
    }

    /// Preorder position of the father of the node at `position`.
    ///
    /// `Ok(None)` for the root.
    pub fn father_of(&self, position: usize) -> Result<Option<usize>, PositionError> {
        Ok(self.entry(position)?.father)
    }

    /// Iterate preorder positions from `position` up to the root, starting
    /// with `position` itself.
    pub fn ancestors(&self, position: usize) -> Result<Ancestors<'_>, PositionError> {
        self.entry(position)?;
        Ok(Ancestors {
            index: &self.index,
            next: Some(position),
        })
    }

    /// The child of the node at `parent_position` that lies on the path from
    /// the node at `descendant_position` up to it.
    ///
    /// There can be at most one such child; `Ok(None)` when `parent_position`
    /// is not a proper ancestor of `descendant_position`.
    pub fn child_on_path_from_descendant(
        &self,
        parent_position: usize,
        descendant_position: usize,
    ) -> Result<Option<usize>, PositionError> {
        self.entry(parent_position)?;

        let mut current = descendant_position;
        let mut father = self
            .father_of(descendant_position)?
            .ok_or(PositionError::NoFather(descendant_position))?;

        while father != parent_position {
            current = father;
            match self.father_of(current)? {
                Some(next) => father = next,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    /// Run a pre-order traversal over the whole tree with the given visitor.
    pub fn perform_preorder_traversal<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.root.accept(visitor);
    }

    /// Render the preorder traversal as one line per node, for debugging.
    pub fn render_preorder(&self) -> String {
        let mut out = String::new();
        for (offset, entry) in self.index.iter().enumerate() {
            let _ = writeln!(
                out,
                "label: {}, preorder_position: {}",
                entry.label,
                offset + 1
            );
        }
        out
    }

    /// Label lookup without the position check, for callers that only ever
    /// hold positions handed out by this tree's own index.
    pub(crate) fn label_index(&self, position: usize) -> &str {
        &self.index[position - 1].label
    }

    /// Father lookup without the position check.
    pub(crate) fn father_index(&self, position: usize) -> Option<usize> {
        self.index[position - 1].father
    }

    fn entry(&self, position: usize) -> Result<&PreorderEntry, PositionError> {
        position
            .checked_sub(1)
            .and_then(|offset| self.index.get(offset))
            .ok_or(PositionError::OutOfRange(position))
    }
}

/// Iterator over the preorder positions on the path from a node to the root.
#[derive(Debug)]
pub struct Ancestors<'a> {
    index: &'a [PreorderEntry],
    next: Option<usize>,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let position = self.next?;
        self.next = self.index[position - 1].father;
        Some(position)
    }
}

/// Visitor that assigns preorder positions as `accept` hands nodes over.
///
/// Fathers are recovered from the pre-order itself: a frame per open node
/// tracks how many of its children are still pending, and a node's father is
/// whatever frame is open when it arrives.
#[derive(Debug, Default)]
struct PreorderIndexer {
    entries: Vec<PreorderEntry>,
    open: Vec<(usize, usize)>,
}

impl Visitor for PreorderIndexer {
    fn visit(&mut self, node: &TreeNode) {
        let position = self.entries.len() + 1;
        let father = self.open.last().map(|&(father_position, _)| father_position);
        if let Some(frame) = self.open.last_mut() {
            frame.1 -= 1;
        }

        self.entries.push(PreorderEntry {
            label: node.debug_string(),
            father,
        });

        self.open.push((position, node.child_count()));
        while matches!(self.open.last(), Some(&(_, 0))) {
            self.open.pop();
        }
    }
}
