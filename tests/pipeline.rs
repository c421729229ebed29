//! End-to-end pipeline: YAML stream -> trees -> correction -> script/dot.

use std::collections::HashSet;

use blake3::hash;
use treediff::{diff_trees, render_dot, trees_from_yaml, EditOp};

const IDENTICAL_TREES: &str = "\
---
Z1:
  - B2:
  - C3:
      - D4:
          - F5:
      - E6:
          - G7:
          - H8:
          - J9:
      - A10:
  - A11:
---
Z1:
  - B2:
  - C3:
      - D4:
          - F5:
      - E6:
          - G7:
          - H8:
          - J9:
      - A10:
  - A11:
";

const RELABELED_LEAF: &str = "\
---
Z1:
  - B2:
  - C3:
      - D4:
      - A10:
---
Z1:
  - B2:
  - C3:
      - D4:
      - A12:
";

#[test]
fn identical_documents_diff_to_zero() {
    let trees = trees_from_yaml(IDENTICAL_TREES).expect("stream parses");
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].size(), 11);

    let report = diff_trees(&trees[0], &trees[1]).expect("diff succeeds");
    assert_eq!(report.distance, 0);
    assert_eq!(report.operations.len(), 11);
    assert!(report
        .operations
        .iter()
        .all(|op| matches!(op, EditOp::Keep { .. })));
}

#[test]
fn relabeled_leaf_is_reported_as_a_change() {
    let trees = trees_from_yaml(RELABELED_LEAF).expect("stream parses");
    let report = diff_trees(&trees[0], &trees[1]).expect("diff succeeds");

    assert_eq!(report.distance, 1);
    let rendered: Vec<String> = report.operations.iter().map(ToString::to_string).collect();
    assert!(rendered.contains(&"Change from A10 (source @5) to A12 (target @5)".to_string()));
}

#[test]
fn dot_output_decorates_the_mapping() {
    let trees = trees_from_yaml(RELABELED_LEAF).expect("stream parses");
    let report = diff_trees(&trees[0], &trees[1]).expect("diff succeeds");
    let dot = render_dot(&trees[0], &trees[1], Some(&report.mapping)).expect("dot renders");

    // Both trees drawn in full, roots pinned to the same rank.
    assert!(dot.contains("subgraph { rank = same; \"SourceZ1\"; \"TargetZ1\" }"));
    assert!(dot.contains("\"SourceZ1\" -> \"SourceB2\""));
    assert!(dot.contains("\"SourceC3\" -> \"SourceA10\""));
    assert!(dot.contains("\"TargetC3\" -> \"TargetA12\""));

    // The relabel crosses the trees as a gray dotted line, everything else
    // matches in green.
    assert!(dot.contains(
        "\"SourceA10\" -> \"TargetA12\" [style=dotted color=\"gray\" constraint=false]"
    ));
    assert!(dot.contains(
        "\"SourceZ1\" -> \"TargetZ1\" [style=dotted color=\"green\" constraint=false]"
    ));
}

#[test]
fn inserted_node_is_drawn_orange() {
    const EXTRA_LEAF: &str = "\
---
Z1:
  - B2:
---
Z1:
  - B2:
  - C3:
";
    let trees = trees_from_yaml(EXTRA_LEAF).expect("stream parses");
    let report = diff_trees(&trees[0], &trees[1]).expect("diff succeeds");
    assert_eq!(report.distance, 1);

    let dot = render_dot(&trees[0], &trees[1], Some(&report.mapping)).expect("dot renders");
    assert!(dot.contains("\"TargetC3\" [color=\"orange\"]"));
    assert!(!dot.contains("\"TargetC3\" [color=\"green\"]"));
}

#[test]
fn pipeline_is_deterministic() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let trees = trees_from_yaml(IDENTICAL_TREES).expect("stream parses");
        let report = diff_trees(&trees[0], &trees[1]).expect("diff succeeds");
        let dot = render_dot(&trees[0], &trees[1], Some(&report.mapping)).expect("dot renders");

        let script: Vec<String> = report.operations.iter().map(ToString::to_string).collect();
        let transcript = format!("{}\n{}\n{}", report.distance, script.join("\n"), dot);
        fingerprints.insert(hash(transcript.as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn preorder_dump_matches_document_order() {
    let trees = trees_from_yaml(RELABELED_LEAF).expect("stream parses");
    let dump = trees[0].render_preorder();
    assert_eq!(
        dump,
        "label: Z1, preorder_position: 1\n\
         label: B2, preorder_position: 2\n\
         label: C3, preorder_position: 3\n\
         label: D4, preorder_position: 4\n\
         label: A10, preorder_position: 5\n"
    );
}
