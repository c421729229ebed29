//! Graphviz rendering of a tree correction
//!
//! Draws the source and target trees side by side in one `digraph` and,
//! when a mapping is supplied, decorates it with the edit operations:
//! dotted cross-links for mapped pairs (green for unchanged labels, gray
//! for relabelings), red for deleted source nodes, orange for inserted
//! target nodes. Output is plain dot text; running `dot` on it is the
//! caller's business.

use crate::diff::MappedPair;
use crate::tree::{PositionError, Tree};

const SOURCE_PREFIX: &str = "Source";
const TARGET_PREFIX: &str = "Target";

/// Render the two trees, and optionally their mapping, as a dot digraph.
pub fn render_dot(
    source: &Tree,
    target: &Tree,
    mapping: Option<&[MappedPair]>,
) -> Result<String, PositionError> {
    let mut generator = DotGenerator::new(source.label_at(1)?, target.label_at(1)?);
    generator.add_tree_edges(source, SOURCE_PREFIX)?;
    generator.add_tree_edges(target, TARGET_PREFIX)?;

    if let Some(mapping) = mapping {
        for &(source_position, target_position) in mapping {
            match (source_position, target_position) {
                (Some(s), Some(t)) => {
                    generator.add_dotted_line(source.label_at(s)?, target.label_at(t)?);
                }
                (Some(s), None) => generator.add_deletion(source.label_at(s)?),
                (None, Some(t)) => generator.add_insertion(target.label_at(t)?),
                (None, None) => {}
            }
        }
    }

    Ok(generator.finish())
}

/// Line-by-line dot assembly, node ids prefixed per tree so the two trees
/// never collide.
#[derive(Debug)]
struct DotGenerator {
    lines: Vec<String>,
}

impl DotGenerator {
    fn new(source_root_label: &str, target_root_label: &str) -> Self {
        let lines = vec![
            "digraph G {".to_string(),
            // Roots of both trees should sit on the same level.
            format!(
                "subgraph {{ rank = same; {}; {} }}",
                node_id(SOURCE_PREFIX, source_root_label),
                node_id(TARGET_PREFIX, target_root_label),
            ),
        ];
        Self { lines }
    }

    fn add_tree_edges(&mut self, tree: &Tree, prefix: &str) -> Result<(), PositionError> {
        for position in 2..=tree.size() {
            if let Some(father) = tree.father_of(position)? {
                self.lines.push(format!(
                    "{} -> {}",
                    node_id(prefix, tree.label_at(father)?),
                    node_id(prefix, tree.label_at(position)?),
                ));
            }
        }
        Ok(())
    }

    fn add_dotted_line(&mut self, source_label: &str, target_label: &str) {
        let color = if source_label == target_label {
            "green"
        } else {
            "gray"
        };
        self.lines.push(format!(
            "{} -> {} [style=dotted color=\"{}\" constraint=false]",
            node_id(SOURCE_PREFIX, source_label),
            node_id(TARGET_PREFIX, target_label),
            color,
        ));
    }

    fn add_deletion(&mut self, source_label: &str) {
        self.lines.push(format!(
            "{} [color=\"red\"]",
            node_id(SOURCE_PREFIX, source_label)
        ));
    }

    fn add_insertion(&mut self, target_label: &str) {
        self.lines.push(format!(
            "{} [color=\"orange\"]",
            node_id(TARGET_PREFIX, target_label)
        ));
    }

    fn finish(mut self) -> String {
        self.lines.push("}".to_string());
        self.lines.join("\n")
    }
}

/// Quoted node identifier; labels are arbitrary strings.
fn node_id(prefix: &str, label: &str) -> String {
    format!("\"{}{}\"", prefix, label.replace('"', "\\\""))
}
