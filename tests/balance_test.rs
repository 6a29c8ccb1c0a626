//! Integration tests for the balance check across both tree representations and both
//! traversal strategies.

use std::fmt;

use generational_arena::Index;
use rstest::rstest;

use treebal::domain::{
    BalanceChecker, BalanceError, Height, NodeTable, Side, Strategy, TableNode, TreeArena, TreeBuilder,
    Verdict,
};
use treebal::util::testing;

fn checker(strategy: Strategy) -> BalanceChecker {
    testing::init_test_setup();
    BalanceChecker::default().with_strategy(strategy)
}

// ============================================================
// Reference scenarios
// ============================================================

#[rstest]
fn given_root_with_two_leaves_when_checked_then_balanced_height_two(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    // Arrange
    let mut tree = TreeArena::new();
    let root = tree.insert(1);
    tree.set_root(Some(root)).unwrap();
    tree.insert_child(root, Side::Left, 2).unwrap();
    tree.insert_child(root, Side::Right, 3).unwrap();

    // Act
    let report = checker(strategy).check(&tree).unwrap();

    // Assert
    assert_eq!(report.verdict, Verdict::Balanced { height: 2 });
    assert_eq!(report.nodes_visited, 3);
}

#[rstest]
fn given_chain_of_2000_when_limit_is_1000_then_depth_exceeded(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let tree = TreeArena::chain(2000, Side::Left);

    let err = checker(strategy)
        .with_max_depth(1000)
        .check(&tree)
        .unwrap_err();

    assert_eq!(
        err,
        BalanceError::DepthExceeded {
            depth: 1000,
            max_depth: 1000
        }
    );
}

#[rstest]
fn given_short_left_chain_with_100_roots_prepended_on_the_right_when_checked_then_unbalanced(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    // Arrange: 1-left-2-left-3, then 100 new roots each holding the old root on its right
    let mut tree = TreeArena::new();
    let one = tree.insert(1);
    tree.set_root(Some(one)).unwrap();
    let two = tree.insert_child(one, Side::Left, 2).unwrap();
    tree.insert_child(two, Side::Left, 3).unwrap();
    for value in 0..100 {
        tree.push_root(100 + value, Side::Right);
    }
    assert_eq!(tree.depth(), 103);

    // Act
    let report = checker(strategy).check(&tree).unwrap();

    // Assert
    assert_eq!(report.verdict, Verdict::Unbalanced);
}

#[rstest]
fn given_corrupted_right_reference_when_checked_then_invalid_reference(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let table = NodeTable::new(
        Some(0),
        vec![TableNode::new(1, Some(1), Some(7)), TableNode::leaf(2)],
    );

    let err = checker(strategy).check(&table).unwrap_err();

    assert_eq!(
        err,
        BalanceError::InvalidReference {
            reference: "7".to_string()
        }
    );
}

// ============================================================
// Guards
// ============================================================

#[test]
fn given_chain_of_100_000_when_checked_iteratively_then_depth_guard_fires_not_the_stack() {
    let tree = TreeArena::chain(100_000, Side::Right);

    let err = checker(Strategy::Iterative).check(&tree).unwrap_err();

    assert!(matches!(err, BalanceError::DepthExceeded { .. }));
}

#[test]
fn given_chain_of_100_000_when_limit_is_raised_then_iterative_walk_finishes() {
    let tree = TreeArena::chain(100_000, Side::Left);

    let report = checker(Strategy::Iterative)
        .with_max_depth(100_000)
        .check(&tree)
        .unwrap();

    // unbalanced from the third node up, the deepest pair is fine
    assert_eq!(report.verdict, Verdict::Unbalanced);
}

#[test]
fn given_level_order_chain_of_100_000_when_parsed_and_walked_then_finishes() {
    // right-leaning chain: every node has an absent left child
    let mut text = String::from("[0");
    for value in 1..100_000 {
        text.push_str(&format!(",null,{}", value));
    }

    let tree = TreeBuilder::new().from_level_order(&text).unwrap();
    assert_eq!(tree.len(), 100_000);
    assert_eq!(tree.depth(), 100_000);

    let report = checker(Strategy::Iterative)
        .with_max_depth(100_000)
        .check(&tree)
        .unwrap();
    assert_eq!(report.verdict, Verdict::Unbalanced);
}

fn cyclic_table() -> NodeTable<&'static str> {
    // 0 -> 1 -> 0 on both sides keeps every level balanced
    NodeTable::new(
        Some(0),
        vec![
            TableNode::new("a", Some(1), Some(1)),
            TableNode::new("b", Some(0), Some(0)),
        ],
    )
}

#[rstest]
fn given_cyclic_table_when_checked_then_not_a_tree(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let err = checker(strategy)
        .with_max_depth(12)
        .check(&cyclic_table())
        .unwrap_err();

    assert_eq!(err, BalanceError::NotATree { nodes: 2 });
}

#[rstest]
fn given_cyclic_table_when_limit_is_below_table_size_then_depth_exceeded(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let err = checker(strategy)
        .with_max_depth(2)
        .check(&cyclic_table())
        .unwrap_err();

    assert_eq!(
        err,
        BalanceError::DepthExceeded {
            depth: 2,
            max_depth: 2
        }
    );
}

#[rstest]
fn given_table_whose_nodes_share_children_when_checked_then_not_a_tree_without_blowup(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    // node i holds i+1 on both sides: a proper tree of this shape would need 2^64 - 1 nodes
    let nodes = (0..64)
        .map(|i| {
            let next = (i < 63).then_some(i + 1);
            TableNode::new(i, next, next)
        })
        .collect();
    let table = NodeTable::new(Some(0), nodes);

    let err = checker(strategy).check(&table).unwrap_err();

    assert_eq!(err, BalanceError::NotATree { nodes: 64 });
}

#[rstest]
fn given_removed_subtree_when_checked_from_stale_handle_then_invalid_reference(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let mut tree = TreeBuilder::new().from_level_order("[1,2,3,4,5]").unwrap();
    let root = tree.root().unwrap();
    let left = tree.left(root).unwrap();

    assert_eq!(tree.remove_subtree(left), 3);
    let err = checker(strategy)
        .check_from(&tree, Some(left))
        .unwrap_err();

    assert!(matches!(err, BalanceError::InvalidReference { .. }));
    // the rest of the tree is intact
    assert_eq!(
        checker(strategy).check(&tree).unwrap().verdict,
        Verdict::Balanced { height: 2 }
    );
}

/// Height type that saturates after two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TwoLevels(u8);

impl fmt::Display for TwoLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Height for TwoLevels {
    const ZERO: Self = TwoLevels(0);
    const MAX: Self = TwoLevels(2);

    fn checked_succ(self) -> Option<Self> {
        (self.0 < 2).then(|| TwoLevels(self.0 + 1))
    }
}

#[rstest]
fn given_balanced_tree_taller_than_height_type_when_checked_then_overflow(
    #[values(Strategy::Recursive, Strategy::Iterative)] strategy: Strategy,
) {
    let tree = TreeBuilder::new().from_level_order("[1,2,3,4]").unwrap();

    let err = BalanceChecker::<TwoLevels>::default()
        .with_strategy(strategy)
        .check(&tree)
        .unwrap_err();

    assert_eq!(
        err,
        BalanceError::HeightOverflow {
            limit: "2".to_string()
        }
    );
}

#[test]
fn given_scenario_trees_when_checked_with_u8_heights_then_same_verdicts_as_u64() {
    let tree = TreeBuilder::new().from_level_order("[1,2,3,4,5,6,7,8]").unwrap();

    let narrow = BalanceChecker::<u8>::default().check(&tree).unwrap();
    let wide = BalanceChecker::<u64>::default().check(&tree).unwrap();

    assert_eq!(narrow.verdict, Verdict::Balanced { height: 4u8 });
    assert_eq!(wide.verdict, Verdict::Balanced { height: 4u64 });
    assert_eq!(narrow.nodes_visited, wide.nodes_visited);
}

// ============================================================
// Agreement with a naive reference over every small shape
// ============================================================

#[derive(Debug, Clone)]
enum Shape {
    Empty,
    Node(Box<Shape>, Box<Shape>),
}

fn shapes(n: usize) -> Vec<Shape> {
    if n == 0 {
        return vec![Shape::Empty];
    }
    let mut out = Vec::new();
    for left_size in 0..n {
        for left in shapes(left_size) {
            for right in shapes(n - 1 - left_size) {
                out.push(Shape::Node(Box::new(left.clone()), Box::new(right)));
            }
        }
    }
    out
}

fn height(shape: &Shape) -> u64 {
    match shape {
        Shape::Empty => 0,
        Shape::Node(l, r) => height(l).max(height(r)) + 1,
    }
}

/// Textbook definition, quadratic on purpose.
fn naive_balanced(shape: &Shape) -> bool {
    match shape {
        Shape::Empty => true,
        Shape::Node(l, r) => {
            height(l).abs_diff(height(r)) <= 1 && naive_balanced(l) && naive_balanced(r)
        }
    }
}

fn to_arena(shape: &Shape) -> TreeArena<usize> {
    fn grow(tree: &mut TreeArena<usize>, shape: &Shape) -> Option<Index> {
        let Shape::Node(l, r) = shape else {
            return None;
        };
        let idx = tree.insert(tree.len());
        let left = grow(tree, l);
        let right = grow(tree, r);
        tree.attach(idx, Side::Left, left).unwrap();
        tree.attach(idx, Side::Right, right).unwrap();
        Some(idx)
    }
    let mut tree = TreeArena::new();
    let root = grow(&mut tree, shape);
    tree.set_root(root).unwrap();
    tree
}

fn to_table(shape: &Shape) -> NodeTable<usize> {
    fn grow(nodes: &mut Vec<TableNode<usize>>, shape: &Shape) -> Option<usize> {
        let Shape::Node(l, r) = shape else {
            return None;
        };
        let idx = nodes.len();
        nodes.push(TableNode::leaf(idx));
        let left = grow(nodes, l);
        let right = grow(nodes, r);
        nodes[idx].left = left;
        nodes[idx].right = right;
        Some(idx)
    }
    let mut nodes = Vec::new();
    let root = grow(&mut nodes, shape);
    NodeTable::new(root, nodes)
}

#[test]
fn given_every_shape_up_to_seven_nodes_when_checked_then_matches_naive_definition() {
    let recursive = checker(Strategy::Recursive);
    let iterative = checker(Strategy::Iterative);
    let mut checked = 0;

    for n in 0..=7 {
        for shape in shapes(n) {
            let expected = naive_balanced(&shape);
            let arena = to_arena(&shape);
            let table = to_table(&shape);

            let by_recursion = recursive.check(&arena).unwrap();
            let by_walk = iterative.check(&arena).unwrap();
            let by_table = iterative.check(&table).unwrap();

            assert_eq!(by_recursion.verdict.is_balanced(), expected, "{:?}", shape);
            assert_eq!(by_recursion, by_walk, "{:?}", shape);
            assert_eq!(by_walk, by_table, "{:?}", shape);
            if expected {
                assert_eq!(by_recursion.verdict.height(), Some(height(&shape)));
                assert_eq!(by_recursion.nodes_visited, n);
            }
            checked += 1;
        }
    }

    // Catalan numbers C0..C7
    assert_eq!(checked, 1 + 1 + 2 + 5 + 14 + 42 + 132 + 429);
}
