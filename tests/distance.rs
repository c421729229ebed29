//! Distance fixtures for the Tai correction algorithm.

use test_case::test_case;
use treediff::{compute_diff, compute_distance, diff_trees, EditOp, Tree, TreeNode};

// A -> B -> D
fn tree_one() -> Tree {
    let mut a = TreeNode::new("A");
    let mut b = TreeNode::new("B");
    b.add_child(TreeNode::new("D"));
    a.add_child(b);
    Tree::new(a)
}

// A with children B and C, C with child D
fn tree_two() -> Tree {
    let mut a = TreeNode::new("A");
    a.add_child(TreeNode::new("B"));
    let mut c = TreeNode::new("C");
    c.add_child(TreeNode::new("D"));
    a.add_child(c);
    Tree::new(a)
}

// A with children B and C, C -> D -> E
fn tree_three() -> Tree {
    let mut a = TreeNode::new("A");
    a.add_child(TreeNode::new("B"));
    let mut c = TreeNode::new("C");
    let mut d = TreeNode::new("D");
    d.add_child(TreeNode::new("E"));
    c.add_child(d);
    a.add_child(c);
    Tree::new(a)
}

// Same shape as tree_three with C relabeled to CC
fn tree_four() -> Tree {
    let mut a = TreeNode::new("A");
    a.add_child(TreeNode::new("B"));
    let mut c = TreeNode::new("CC");
    let mut d = TreeNode::new("D");
    d.add_child(TreeNode::new("E"));
    c.add_child(d);
    a.add_child(c);
    Tree::new(a)
}

#[test_case(tree_one(), tree_two(), 2; "chain to branching")]
#[test_case(tree_one(), tree_three(), 3; "chain to deep branching")]
#[test_case(tree_two(), tree_three(), 1; "one extra leaf")]
#[test_case(tree_three(), tree_four(), 1; "one relabel")]
#[test_case(tree_two(), tree_two(), 0; "identical trees")]
fn minimum_distance(source: Tree, target: Tree, expected: u32) {
    assert_eq!(compute_distance(&source, &target), expected);
}

#[test]
fn distance_is_symmetric_for_insert_and_delete() {
    // Inserting E going one way, deleting it coming back.
    assert_eq!(compute_distance(&tree_two(), &tree_three()), 1);
    assert_eq!(compute_distance(&tree_three(), &tree_two()), 1);
}

#[test]
fn identical_trees_map_identically() {
    let diff = compute_diff(&tree_two(), &tree_two());
    assert_eq!(diff.distance, 0);
    assert_eq!(
        diff.mapping,
        vec![
            (Some(1), Some(1)),
            (Some(2), Some(2)),
            (Some(3), Some(3)),
            (Some(4), Some(4)),
        ]
    );
}

#[test]
fn extra_leaf_shows_up_as_an_insertion() {
    let source = tree_two();
    let target = tree_three();
    let diff = compute_diff(&source, &target);
    assert_eq!(
        diff.mapping,
        vec![
            (Some(1), Some(1)),
            (Some(2), Some(2)),
            (Some(3), Some(3)),
            (Some(4), Some(4)),
            (None, Some(5)),
        ]
    );

    let script = diff.edit_script(&source, &target).expect("script resolves");
    assert_eq!(
        script.last(),
        Some(&EditOp::Insert {
            target_position: 5,
            label: "E".to_string(),
        })
    );
}

#[test]
fn mapping_covers_both_trees_exactly_once() {
    let source = tree_one();
    let target = tree_three();
    let diff = compute_diff(&source, &target);

    let mut source_positions: Vec<usize> =
        diff.mapping.iter().filter_map(|&(s, _)| s).collect();
    source_positions.sort_unstable();
    assert_eq!(source_positions, (1..=source.size()).collect::<Vec<_>>());

    let mut target_positions: Vec<usize> =
        diff.mapping.iter().filter_map(|&(_, t)| t).collect();
    target_positions.sort_unstable();
    assert_eq!(target_positions, (1..=target.size()).collect::<Vec<_>>());
}

#[test]
fn report_script_matches_the_distance() {
    // Roots are matched for free; every other non-Keep operation costs 1.
    let source = tree_three();
    let target = tree_four();
    let report = diff_trees(&source, &target).expect("diff succeeds");

    let costly = report
        .operations
        .iter()
        .filter(|op| !matches!(op, EditOp::Keep { .. }))
        .count() as u32;
    assert_eq!(report.distance, costly);
}
