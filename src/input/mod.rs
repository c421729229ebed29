//! Building trees from YAML descriptions
//!
//! A YAML stream describes one tree per document. Every node is a
//! single-key mapping: the key is the node label, the value is either null
//! (a leaf) or the sequence of child nodes.
//!
//! ```yaml
//! ---
//! A:
//!   - B:
//!   - C:
//!       - D:
//! ```

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::tree::{Tree, TreeNode};

/// Errors raised while turning YAML documents into trees.
#[derive(Debug, Error)]
pub enum YamlTreeError {
    /// The stream is not valid YAML.
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A node must be a mapping from its label to its children.
    #[error("expected a single-key mapping for a tree node, found {0}")]
    NotANode(&'static str),

    /// A node mapping must have exactly one key.
    #[error("expected exactly one label per tree node, found {0} keys")]
    MultipleLabels(usize),

    /// Node labels must be scalars.
    #[error("node label must be a scalar, found {0}")]
    InvalidLabel(&'static str),

    /// A node body must be null (leaf) or a sequence of child nodes.
    #[error("children of a node must be a sequence, found {0}")]
    InvalidChildList(&'static str),
}

/// Parse a multi-document YAML stream into one tree per non-empty document.
pub fn trees_from_yaml(text: &str) -> Result<Vec<Tree>, YamlTreeError> {
    let mut trees = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let (label, body) = single_entry(&value)?;
        trees.push(Tree::new(build_node(label, body)?));
    }
    debug!(count = trees.len(), "parsed trees from YAML stream");
    Ok(trees)
}

fn build_node(label: &Value, body: &Value) -> Result<TreeNode, YamlTreeError> {
    let mut node = TreeNode::new(scalar_label(label)?);
    match body {
        Value::Null => {}
        Value::Sequence(children) => {
            for child in children {
                let (child_label, child_body) = single_entry(child)?;
                node.add_child(build_node(child_label, child_body)?);
            }
        }
        other => return Err(YamlTreeError::InvalidChildList(kind_of(other))),
    }
    Ok(node)
}

fn single_entry(value: &Value) -> Result<(&Value, &Value), YamlTreeError> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| YamlTreeError::NotANode(kind_of(value)))?;
    if mapping.len() != 1 {
        return Err(YamlTreeError::MultipleLabels(mapping.len()));
    }
    let mut entries = mapping.iter();
    entries
        .next()
        .ok_or(YamlTreeError::MultipleLabels(0))
}

fn scalar_label(value: &Value) -> Result<String, YamlTreeError> {
    match value {
        Value::String(label) => Ok(label.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(YamlTreeError::InvalidLabel(kind_of(other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TraversalLog;

    #[test]
    fn test_single_document() {
        let trees = trees_from_yaml(
            "---\nA:\n  - B:\n  - C:\n      - D:\n",
        )
        .expect("stream parses");
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].size(), 4);

        let mut log = TraversalLog::new();
        trees[0].perform_preorder_traversal(&mut log);
        assert_eq!(log.entries(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_two_documents() {
        let text = "\n---\nZ1:\n  - B2:\n  - C3:\n---\nZ1:\n  - B2:\n";
        let trees = trees_from_yaml(text).expect("stream parses");
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].size(), 3);
        assert_eq!(trees[1].size(), 2);
    }

    #[test]
    fn test_leaf_only_document() {
        let trees = trees_from_yaml("A:\n").expect("stream parses");
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].size(), 1);
        assert_eq!(trees[0].label_at(1), Ok("A"));
    }

    #[test]
    fn test_numeric_labels_become_strings() {
        let trees = trees_from_yaml("1:\n  - 2:\n").expect("stream parses");
        assert_eq!(trees[0].label_at(1), Ok("1"));
        assert_eq!(trees[0].label_at(2), Ok("2"));
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let error = trees_from_yaml("- A\n- B\n").unwrap_err();
        assert!(matches!(error, YamlTreeError::NotANode("a sequence")));
    }

    #[test]
    fn test_rejects_multiple_roots_in_one_document() {
        let error = trees_from_yaml("A:\nB:\n").unwrap_err();
        assert!(matches!(error, YamlTreeError::MultipleLabels(2)));
    }

    #[test]
    fn test_rejects_scalar_children() {
        let error = trees_from_yaml("A: leaf\n").unwrap_err();
        assert!(matches!(error, YamlTreeError::InvalidChildList("a string")));
    }
}
