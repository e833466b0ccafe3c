use super::*;
use crate::model::types::EdgeStyle;
use proptest::prelude::*;

fn node(id: &str) -> Node {
    Node::new(id, id, Position::default())
}

fn edge(a: &str, b: &str) -> Edge {
    Edge::new(a, b, EdgeStyle::default())
}

fn nodes(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| node(id)).collect()
}

fn chain() -> (Vec<Node>, Vec<Edge>) {
    (nodes(&["A", "B", "C"]), vec![edge("A", "B"), edge("B", "C")])
}

fn engine() -> SugiyamaLayout {
    SugiyamaLayout::default()
}

// ── cycle removal ────────────────────────────────────────────────────────

#[test]
fn test_remove_cycles_dag_untouched() {
    let mut ag = AdjGraph::new();
    for n in ["A", "B", "C"] {
        ag.add_node(n);
    }
    ag.add_edge("A", "B");
    ag.add_edge("B", "C");
    let (dag, reversed) = remove_cycles(&ag);
    assert!(reversed.is_empty());
    assert_eq!(dag.edges.len(), 2);
}

#[test]
fn test_remove_cycles_triangle_reverses_one_edge() {
    let mut ag = AdjGraph::new();
    for n in ["A", "B", "C"] {
        ag.add_node(n);
    }
    ag.add_edge("A", "B");
    ag.add_edge("B", "C");
    ag.add_edge("C", "A");
    let (dag, reversed) = remove_cycles(&ag);
    assert_eq!(reversed.len(), 1);
    assert!(reversed.contains(&("C".to_string(), "A".to_string())));
    assert!(dag.edges.contains(&("A".to_string(), "C".to_string())));
}

#[test]
fn test_greedy_fas_is_insertion_ordered() {
    let mut ag = AdjGraph::new();
    for n in ["Z", "Y", "X"] {
        ag.add_node(n);
    }
    let first = greedy_fas_ordering(&ag);
    let second = greedy_fas_ordering(&ag);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

// ── layering ─────────────────────────────────────────────────────────────

#[test]
fn test_chain_ranks() {
    let (n, e) = chain();
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.rank_count, 3);
    assert_eq!(result.ranks["A"], 0);
    assert_eq!(result.ranks["B"], 1);
    assert_eq!(result.ranks["C"], 2);
}

#[test]
fn test_long_edge_does_not_collapse_ranks() {
    let n = nodes(&["A", "B", "C"]);
    let e = vec![edge("A", "B"), edge("B", "C"), edge("A", "C")];
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.ranks["C"], 2);
    // The dummy that carries A→C never shows up in the output.
    assert_eq!(result.positions.len(), 3);
    assert!(result.positions.keys().all(|k| !k.starts_with(DUMMY_PREFIX)));
}

#[test]
fn test_node_named_like_a_dummy_keeps_its_rank() {
    // The long edge a→b needs a dummy; a caller node already owns the
    // name the first dummy would get.
    let n = nodes(&["a", "c", "b", "__dummy_0_0"]);
    let e = vec![
        edge("a", "b"),
        edge("a", "c"),
        edge("c", "b"),
        edge("__dummy_0_0", "a"),
    ];
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.ranks["__dummy_0_0"], 0);
    assert_eq!(result.ranks["a"], 1);
    assert_eq!(result.ranks["c"], 2);
    assert_eq!(result.ranks["b"], 3);
    let y = |id: &str| result.positions[id].y;
    assert!(y("__dummy_0_0") < y("a"));
    assert!(y("a") < y("c"));
    assert!(y("c") < y("b"));
    assert_eq!(result.positions.len(), 4);
}

#[test]
fn test_dummy_prefix_avoids_caller_ids() {
    let mut ag = AdjGraph::new();
    for n in ["a", "__dummy_7", "__dummy__x"] {
        ag.add_node(n);
    }
    let prefix = dummy_prefix(&ag);
    assert!(ag.nodes.iter().all(|id| !id.starts_with(&prefix)));
    assert_eq!(prefix, "__dummy___");
}

#[test]
fn test_self_loop_ignored_for_ranking() {
    let n = nodes(&["A", "B"]);
    let e = vec![edge("A", "A"), edge("A", "B")];
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.ranks["A"], 0);
    assert_eq!(result.ranks["B"], 1);
    assert_eq!(result.reversed_edges, 0);
}

// ── coordinates ──────────────────────────────────────────────────────────

#[test]
fn test_chain_top_to_bottom() {
    let (n, e) = chain();
    let pos = engine().layout(&n, &e, Direction::TopToBottom);
    assert_eq!(pos["A"], Position::new(0.0, 0.0));
    assert_eq!(pos["B"], Position::new(0.0, 86.0));
    assert_eq!(pos["C"], Position::new(0.0, 172.0));
}

#[test]
fn test_chain_left_to_right() {
    let (n, e) = chain();
    let pos = engine().layout(&n, &e, Direction::LeftToRight);
    assert!(pos["A"].x < pos["B"].x);
    assert!(pos["B"].x < pos["C"].x);
    assert_eq!(pos["A"], Position::new(0.0, 0.0));
    assert_eq!(pos["B"], Position::new(222.0, 0.0));
    assert_eq!(pos["C"], Position::new(444.0, 0.0));
}

#[test]
fn test_isolated_nodes_share_first_rank() {
    let n = nodes(&["A", "B", "C"]);
    let pos = engine().layout(&n, &[], Direction::TopToBottom);
    assert_eq!(pos.len(), 3);
    assert_eq!(pos["A"], Position::new(0.0, 0.0));
    assert_eq!(pos["B"], Position::new(222.0, 0.0));
    assert_eq!(pos["C"], Position::new(444.0, 0.0));
}

#[test]
fn test_isolated_node_next_to_chain_is_placed() {
    let n = nodes(&["A", "B", "lonely"]);
    let pos = engine().layout(&n, &[edge("A", "B")], Direction::TopToBottom);
    assert_eq!(pos.len(), 3);
    assert_eq!(pos["lonely"].y, pos["A"].y);
    assert!(pos["B"].y > pos["A"].y);
}

#[test]
fn test_measured_size_widens_rank_gap() {
    let mut tall = node("A");
    tall.size = Some(Size::new(100.0, 200.0));
    let n = vec![tall, node("B")];
    let pos = engine().layout(&n, &[edge("A", "B")], Direction::TopToBottom);
    assert_eq!(pos["B"].y, 250.0);
}

#[test]
fn test_custom_separation() {
    let config = LayoutConfig {
        rank_sep: 10.0,
        ..LayoutConfig::default()
    };
    let (n, e) = chain();
    let pos = SugiyamaLayout::new(config).layout(&n, &e, Direction::TopToBottom);
    assert_eq!(pos["B"].y, 46.0);
    assert_eq!(pos["C"].y, 92.0);
}

// ── robustness ───────────────────────────────────────────────────────────

#[test]
fn test_cycle_terminates_and_places_all() {
    let n = nodes(&["A", "B", "C"]);
    let e = vec![edge("A", "B"), edge("B", "C"), edge("C", "A")];
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.positions.len(), 3);
    assert_eq!(result.reversed_edges, 1);
    assert!(result.positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_two_cycle() {
    let n = nodes(&["A", "B"]);
    let e = vec![edge("A", "B"), edge("B", "A")];
    let pos = engine().layout(&n, &e, Direction::LeftToRight);
    assert_eq!(pos.len(), 2);
    assert_ne!(pos["A"], pos["B"]);
}

#[test]
fn test_empty_input() {
    let result = engine().run(&[], &[], Direction::TopToBottom);
    assert!(result.positions.is_empty());
}

#[test]
fn test_dangling_edges_skipped() {
    let n = nodes(&["A", "B"]);
    let e = vec![edge("A", "B"), edge("B", "gone")];
    let result = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(result.skipped_edges, 1);
    assert_eq!(result.positions.len(), 2);
    assert!(!result.positions.contains_key("gone"));
}

#[test]
fn test_repeated_runs_identical() {
    let n = nodes(&["A", "B", "C", "D", "E"]);
    let e = vec![
        edge("A", "C"),
        edge("B", "C"),
        edge("C", "D"),
        edge("A", "E"),
        edge("E", "A"),
    ];
    let first = engine().run(&n, &e, Direction::TopToBottom);
    let second = engine().run(&n, &e, Direction::TopToBottom);
    assert_eq!(first, second);
}

#[test]
fn test_no_state_leaks_between_runs() {
    let e = engine();
    let (n, edges) = chain();
    e.layout(&n, &edges, Direction::TopToBottom);

    // A smaller graph on the same engine must not see A, B or C.
    let smaller = nodes(&["X"]);
    let pos = e.layout(&smaller, &[], Direction::TopToBottom);
    assert_eq!(pos.len(), 1);
    assert_eq!(pos["X"], Position::new(0.0, 0.0));

    // And the original input lays out exactly as before.
    let fresh = engine().layout(&n, &edges, Direction::TopToBottom);
    assert_eq!(e.layout(&n, &edges, Direction::TopToBottom), fresh);
}

#[test]
fn test_crossing_minimisation_uncrosses() {
    // A→D and B→C start crossed in insertion order.
    let n = nodes(&["A", "B", "C", "D"]);
    let e = vec![edge("A", "D"), edge("B", "C")];
    let lg = LayoutGraph::from_elements(&n, &e, &LayoutConfig::default());
    let ag = adj_from_layout_graph(&lg);
    let (dag, _) = remove_cycles(&ag);
    let la = LayerAssignment::assign(&dag);
    let aug = insert_dummy_nodes(&dag, &la);
    let ordering = minimise_crossings(&aug, 24);
    assert_eq!(count_crossings(&ordering, &aug.ag), 0);
}

#[test]
fn test_layout_free_function_matches_default_engine() {
    let (n, e) = chain();
    assert_eq!(
        crate::layout::layout(&n, &e, Direction::LeftToRight),
        engine().layout(&n, &e, Direction::LeftToRight)
    );
}

// ── properties ───────────────────────────────────────────────────────────

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..10).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..20)))
}

proptest! {
    #[test]
    fn prop_every_node_placed_once((n, raw) in graph_strategy(), lr in any::<bool>()) {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let ns: Vec<Node> = ids.iter().map(|id| node(id)).collect();
        let es: Vec<Edge> = raw.iter().map(|&(a, b)| edge(&ids[a], &ids[b])).collect();
        let dir = if lr { Direction::LeftToRight } else { Direction::TopToBottom };

        let first = engine().layout(&ns, &es, dir);
        let second = engine().layout(&ns, &es, dir);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), n);
        for id in &ids {
            let p = first[id];
            prop_assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn prop_forward_edges_follow_flow((n, raw) in graph_strategy(), lr in any::<bool>()) {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let ns: Vec<Node> = ids.iter().map(|id| node(id)).collect();
        // Only low → high index edges, so the input is acyclic.
        let forward: Vec<(usize, usize)> = raw.into_iter().filter(|(a, b)| a < b).collect();
        let es: Vec<Edge> = forward.iter().map(|&(a, b)| edge(&ids[a], &ids[b])).collect();
        let dir = if lr { Direction::LeftToRight } else { Direction::TopToBottom };

        let pos = engine().layout(&ns, &es, dir);
        for &(a, b) in &forward {
            let (pa, pb) = (pos[&ids[a]], pos[&ids[b]]);
            if lr {
                prop_assert!(pa.x < pb.x);
            } else {
                prop_assert!(pa.y < pb.y);
            }
        }
    }
}
