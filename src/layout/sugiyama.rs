//! Sugiyama layered graph layout algorithm.
//!
//! Phases:
//!   1. Cycle removal (greedy-FAS)
//!   2. Layer assignment (longest path)
//!   3. Dummy node insertion
//!   4. Crossing minimisation (barycenter)
//!   5. Coordinate assignment
//!   6. Direction transpose
//!
//! All scratch state lives in locals of a single `run` call. Every phase
//! walks nodes in store insertion order, never in hash order, so the same
//! input always yields the same positions.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::info;

use super::LayoutEngine;
use super::graph::LayoutGraph;
use crate::config::LayoutConfig;
use crate::model::types::{Direction, Edge, Node, NodeId, Position, Positions, Size};

pub const DUMMY_PREFIX: &str = "__dummy_";

/// A dummy-id prefix that no real node id starts with. Dummy ids are
/// `{prefix}{edge}_{step}`, so they can never name a caller's node.
fn dummy_prefix(ag: &AdjGraph) -> String {
    let mut prefix = DUMMY_PREFIX.to_string();
    while ag.nodes.iter().any(|id| id.starts_with(&prefix)) {
        prefix.push('_');
    }
    prefix
}

// ─── Mini-graph helpers ───────────────────────────────────────────────────────

/// Adjacency-list graph used inside the phases.
/// Maps node_id → (successors, predecessors).
pub struct AdjGraph {
    /// All node ids, in insertion order.
    nodes: Vec<String>,
    successors: HashMap<String, Vec<String>>,
    predecessors: HashMap<String, Vec<String>>,
    /// Edges as (src, tgt), in insertion order.
    edges: Vec<(String, String)>,
}

impl AdjGraph {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            successors: HashMap::new(),
            predecessors: HashMap::new(),
            edges: Vec::new(),
        }
    }

    fn add_node(&mut self, id: &str) {
        if !self.successors.contains_key(id) {
            self.nodes.push(id.to_string());
            self.successors.insert(id.to_string(), Vec::new());
            self.predecessors.insert(id.to_string(), Vec::new());
        }
    }

    fn add_edge(&mut self, src: &str, tgt: &str) {
        self.successors
            .entry(src.to_string())
            .or_default()
            .push(tgt.to_string());
        self.predecessors
            .entry(tgt.to_string())
            .or_default()
            .push(src.to_string());
        self.edges.push((src.to_string(), tgt.to_string()));
    }

    fn out_degree(&self, id: &str) -> usize {
        self.successors.get(id).map(|v| v.len()).unwrap_or(0)
    }

    fn in_degree(&self, id: &str) -> usize {
        self.predecessors.get(id).map(|v| v.len()).unwrap_or(0)
    }

    fn successors_of(&self, id: &str) -> &[String] {
        self.successors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn predecessors_of(&self, id: &str) -> &[String] {
        self.predecessors
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Build an AdjGraph from the petgraph snapshot. Self-loops carry no
/// ranking information and are left out.
fn adj_from_layout_graph(lg: &LayoutGraph) -> AdjGraph {
    let mut ag = AdjGraph::new();
    for idx in lg.digraph.node_indices() {
        ag.add_node(&lg.digraph[idx].id);
    }
    for (src, tgt) in lg.edge_pairs() {
        if src != tgt {
            ag.add_edge(&src, &tgt);
        }
    }
    ag
}

// ─── Cycle Removal (Greedy-FAS) ─────────────────────────────────────────────

/// Compute a node ordering using the greedy-FAS heuristic (Eades et al.).
fn greedy_fas_ordering(ag: &AdjGraph) -> Vec<String> {
    let mut active: HashSet<&str> = ag.nodes.iter().map(|s| s.as_str()).collect();
    let mut out_deg: HashMap<&str, i64> = HashMap::new();
    let mut in_deg: HashMap<&str, i64> = HashMap::new();
    for node in &ag.nodes {
        out_deg.insert(node, ag.out_degree(node) as i64);
        in_deg.insert(node, ag.in_degree(node) as i64);
    }

    let mut s1: Vec<String> = Vec::new();
    let mut s2: Vec<String> = Vec::new();

    while !active.is_empty() {
        loop {
            let sinks: Vec<&str> = ag
                .nodes
                .iter()
                .map(|s| s.as_str())
                .filter(|n| active.contains(n) && out_deg[n] == 0)
                .collect();
            if sinks.is_empty() {
                break;
            }
            for sink in sinks {
                active.remove(sink);
                s2.push(sink.to_string());
                for pred in ag.predecessors_of(sink) {
                    if active.contains(pred.as_str()) {
                        *out_deg.entry(pred.as_str()).or_insert(0) -= 1;
                    }
                }
            }
        }

        loop {
            let sources: Vec<&str> = ag
                .nodes
                .iter()
                .map(|s| s.as_str())
                .filter(|n| active.contains(n) && in_deg[n] == 0)
                .collect();
            if sources.is_empty() {
                break;
            }
            for source in sources {
                active.remove(source);
                s1.push(source.to_string());
                for succ in ag.successors_of(source) {
                    if active.contains(succ.as_str()) {
                        *in_deg.entry(succ.as_str()).or_insert(0) -= 1;
                    }
                }
            }
        }

        // Only cycles remain: peel the node with the largest out-in surplus.
        // Ties go to the earliest node in insertion order.
        let mut best: Option<(&str, i64)> = None;
        for n in ag.nodes.iter().map(|s| s.as_str()) {
            if !active.contains(n) {
                continue;
            }
            let delta = out_deg[n] - in_deg[n];
            if best.is_none_or(|(_, d)| delta > d) {
                best = Some((n, delta));
            }
        }
        if let Some((node, _)) = best {
            active.remove(node);
            s1.push(node.to_string());
            for succ in ag.successors_of(node) {
                if active.contains(succ.as_str()) {
                    *in_deg.entry(succ.as_str()).or_insert(0) -= 1;
                }
            }
            for pred in ag.predecessors_of(node) {
                if active.contains(pred.as_str()) {
                    *out_deg.entry(pred.as_str()).or_insert(0) -= 1;
                }
            }
        }
    }

    s2.reverse();
    s1.extend(s2);
    s1
}

/// Remove cycles using greedy-FAS. Returns (dag, reversed_edges).
fn remove_cycles(ag: &AdjGraph) -> (AdjGraph, HashSet<(String, String)>) {
    let mut dag = AdjGraph::new();
    let mut reversed_edges: HashSet<(String, String)> = HashSet::new();
    if ag.nodes.is_empty() {
        return (dag, reversed_edges);
    }

    let ordering = greedy_fas_ordering(ag);
    let position: HashMap<&str, usize> = ordering
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();

    for node_id in &ag.nodes {
        dag.add_node(node_id);
    }
    for (src, tgt) in &ag.edges {
        let src_pos = position.get(src.as_str()).copied().unwrap_or(0);
        let tgt_pos = position.get(tgt.as_str()).copied().unwrap_or(0);
        if src_pos > tgt_pos {
            reversed_edges.insert((src.clone(), tgt.clone()));
            dag.add_edge(tgt, src);
        } else {
            dag.add_edge(src, tgt);
        }
    }

    (dag, reversed_edges)
}

// ─── Layer Assignment ────────────────────────────────────────────────────────

pub struct LayerAssignment {
    pub layers: HashMap<String, usize>,
    pub layer_count: usize,
}

impl LayerAssignment {
    /// Longest-path layering: every node sits one layer below its deepest
    /// predecessor; sources and isolated nodes sit on layer 0.
    fn assign(dag: &AdjGraph) -> Self {
        let mut layers: HashMap<String, usize> =
            dag.nodes.iter().map(|n| (n.clone(), 0)).collect();

        // Each pass can only raise a layer, and no layer exceeds the node
        // count on a DAG, so this terminates.
        let mut changed = true;
        while changed {
            changed = false;
            for (src, tgt) in &dag.edges {
                let src_layer = *layers.get(src).unwrap_or(&0);
                let tgt_layer = layers.entry(tgt.clone()).or_insert(0);
                if *tgt_layer < src_layer + 1 {
                    *tgt_layer = src_layer + 1;
                    changed = true;
                }
            }
        }

        let layer_count = layers.values().copied().max().map(|m| m + 1).unwrap_or(1);

        Self {
            layers,
            layer_count,
        }
    }
}

// ─── Dummy Node Insertion ────────────────────────────────────────────────────

pub struct AugmentedGraph {
    pub ag: AdjGraph,
    pub layers: HashMap<String, usize>,
    pub layer_count: usize,
    /// Number of dummy nodes inserted for long edges.
    pub dummy_count: usize,
}

/// Split every edge spanning more than one layer into a chain through one
/// dummy node per intermediate layer.
fn insert_dummy_nodes(dag: &AdjGraph, la: &LayerAssignment) -> AugmentedGraph {
    let prefix = dummy_prefix(dag);
    let mut new_ag = AdjGraph::new();
    for node_id in &dag.nodes {
        new_ag.add_node(node_id);
    }

    let mut layers = la.layers.clone();
    let mut dummy_count = 0usize;

    for (edge_no, (src_id, tgt_id)) in dag.edges.iter().enumerate() {
        let src_layer = *layers.get(src_id).unwrap_or(&0);
        let tgt_layer = *layers.get(tgt_id).unwrap_or(&0);
        let span = tgt_layer.saturating_sub(src_layer);

        if span <= 1 {
            new_ag.add_edge(src_id, tgt_id);
            continue;
        }

        let mut chain_prev = src_id.clone();
        for i in 0..span - 1 {
            let dummy_id = format!("{prefix}{edge_no}_{i}");
            new_ag.add_node(&dummy_id);
            layers.insert(dummy_id.clone(), src_layer + i + 1);
            new_ag.add_edge(&chain_prev, &dummy_id);
            chain_prev = dummy_id;
            dummy_count += 1;
        }
        new_ag.add_edge(&chain_prev, tgt_id);
    }

    AugmentedGraph {
        ag: new_ag,
        layers,
        layer_count: la.layer_count,
        dummy_count,
    }
}

// ─── Crossing Minimization ───────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Sweep {
    Down,
    Up,
}

fn barycenter(node_id: &str, ag: &AdjGraph, neighbor_pos: &HashMap<&str, f64>, sweep: Sweep) -> f64 {
    let neighbors = match sweep {
        Sweep::Down => ag.predecessors_of(node_id),
        Sweep::Up => ag.successors_of(node_id),
    };
    let positions: Vec<f64> = neighbors
        .iter()
        .filter_map(|nb| neighbor_pos.get(nb.as_str()).copied())
        .collect();
    if positions.is_empty() {
        f64::INFINITY
    } else {
        positions.iter().sum::<f64>() / positions.len() as f64
    }
}

pub fn count_crossings(ordering: &[Vec<String>], ag: &AdjGraph) -> usize {
    let mut total = 0usize;
    for l_idx in 0..ordering.len().saturating_sub(1) {
        let tgt_pos: HashMap<&str, usize> = ordering[l_idx + 1]
            .iter()
            .enumerate()
            .map(|(i, nid)| (nid.as_str(), i))
            .collect();
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (sp, src_id) in ordering[l_idx].iter().enumerate() {
            for nb in ag.successors_of(src_id) {
                if let Some(&tp) = tgt_pos.get(nb.as_str()) {
                    edges.push((sp, tp));
                }
            }
        }
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                let (ei0, ei1) = edges[i];
                let (ej0, ej1) = edges[j];
                if (ei0 < ej0 && ei1 > ej1) || (ei0 > ej0 && ei1 < ej1) {
                    total += 1;
                }
            }
        }
    }
    total
}

fn sort_layer(ordering: &mut [Vec<String>], layer_idx: usize, fixed_idx: usize, ag: &AdjGraph, sweep: Sweep) {
    let fixed = ordering[fixed_idx].clone();
    let pos: HashMap<&str, f64> = fixed
        .iter()
        .enumerate()
        .map(|(i, nid)| (nid.as_str(), i as f64))
        .collect();
    // Stable sort: nodes with equal barycenters keep their current order.
    ordering[layer_idx].sort_by(|a, b| {
        let ba = barycenter(a, ag, &pos, sweep);
        let bb = barycenter(b, ag, &pos, sweep);
        ba.partial_cmp(&bb).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Order nodes within each layer, starting from insertion order and running
/// alternating down/up barycenter sweeps while the crossing count improves.
pub fn minimise_crossings(aug: &AugmentedGraph, max_passes: usize) -> Vec<Vec<String>> {
    let layer_count = aug.layer_count;
    let mut ordering: Vec<Vec<String>> = vec![Vec::new(); layer_count];
    for node_id in &aug.ag.nodes {
        let layer = *aug.layers.get(node_id).unwrap_or(&0);
        if layer < ordering.len() {
            ordering[layer].push(node_id.clone());
        }
    }

    let mut best = ordering.clone();
    let mut best_crossings = count_crossings(&ordering, &aug.ag);

    for _pass in 0..max_passes {
        if best_crossings == 0 {
            break;
        }
        for layer_idx in 1..layer_count {
            sort_layer(&mut ordering, layer_idx, layer_idx - 1, &aug.ag, Sweep::Down);
        }
        for layer_idx in (0..layer_count.saturating_sub(1)).rev() {
            sort_layer(&mut ordering, layer_idx, layer_idx + 1, &aug.ag, Sweep::Up);
        }

        let crossings = count_crossings(&ordering, &aug.ag);
        if crossings >= best_crossings {
            break;
        }
        best_crossings = crossings;
        best = ordering.clone();
    }

    best
}

// ─── Coordinate Assignment ───────────────────────────────────────────────────

/// A placed node in the top-to-bottom frame: `cross` runs along a layer,
/// `rank` runs across layers. Both are centre coordinates.
#[derive(Debug, Clone)]
struct Placed {
    layer: usize,
    cross: f64,
    rank: f64,
    /// Extent along a layer.
    breadth: f64,
    /// Extent across layers.
    depth: f64,
}

fn assign_coordinates(
    ordering: &[Vec<String>],
    aug: &AugmentedGraph,
    frame_size: &dyn Fn(&str) -> (f64, f64),
    config: &LayoutConfig,
) -> HashMap<String, Placed> {
    // Layer depth is the deepest node it holds.
    let layer_depth: Vec<f64> = ordering
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|id| frame_size(id).1)
                .fold(0.0_f64, f64::max)
        })
        .collect();

    let mut layer_center: Vec<f64> = Vec::with_capacity(ordering.len());
    let mut cursor = 0.0;
    for (i, &depth) in layer_depth.iter().enumerate() {
        if i > 0 {
            cursor += config.rank_sep;
        }
        layer_center.push(cursor + depth / 2.0);
        cursor += depth;
    }

    let layer_breadth: Vec<f64> = ordering
        .iter()
        .map(|layer| {
            let sum: f64 = layer.iter().map(|id| frame_size(id).0).sum();
            let gaps = layer.len().saturating_sub(1) as f64 * config.node_sep;
            sum + gaps
        })
        .collect();
    let max_breadth = layer_breadth.iter().copied().fold(0.0_f64, f64::max);

    let mut placed: HashMap<String, Placed> = HashMap::new();
    for (layer_idx, layer) in ordering.iter().enumerate() {
        let mut x = (max_breadth - layer_breadth[layer_idx]) / 2.0;
        for id in layer {
            let (breadth, depth) = frame_size(id);
            placed.insert(
                id.clone(),
                Placed {
                    layer: layer_idx,
                    cross: x + breadth / 2.0,
                    rank: layer_center[layer_idx],
                    breadth,
                    depth,
                },
            );
            x += breadth + config.node_sep;
        }
    }

    // Barycenter refinement: forward pass (child layer aligns to parents),
    // then backward pass (parent layer aligns to children). A layer moves as
    // a block, so in-layer order and spacing are preserved.
    for layer_idx in 1..ordering.len() {
        align_layer(&ordering[layer_idx], layer_idx - 1, &aug.ag, &mut placed, Sweep::Down, config);
    }
    for layer_idx in (0..ordering.len().saturating_sub(1)).rev() {
        align_layer(&ordering[layer_idx], layer_idx + 1, &aug.ag, &mut placed, Sweep::Up, config);
    }

    // Normalise so the leftmost box edge sits at 0.
    let min_left = placed
        .values()
        .map(|p| p.cross - p.breadth / 2.0)
        .fold(f64::INFINITY, f64::min);
    if min_left.is_finite() && min_left != 0.0 {
        for p in placed.values_mut() {
            p.cross -= min_left;
        }
    }

    placed
}

fn align_layer(
    layer: &[String],
    neighbor_layer: usize,
    ag: &AdjGraph,
    placed: &mut HashMap<String, Placed>,
    sweep: Sweep,
    config: &LayoutConfig,
) {
    let mut sum_self = 0.0;
    let mut sum_other = 0.0;
    let mut count = 0usize;
    for id in layer {
        let Some(me) = placed.get(id) else { continue };
        let neighbors = match sweep {
            Sweep::Down => ag.predecessors_of(id),
            Sweep::Up => ag.successors_of(id),
        };
        for nb in neighbors {
            if let Some(other) = placed.get(nb) {
                if other.layer == neighbor_layer {
                    sum_self += me.cross;
                    sum_other += other.cross;
                    count += 1;
                }
            }
        }
    }
    if count == 0 {
        return;
    }
    let shift = (sum_other - sum_self) / count as f64;
    if shift.abs() > config.node_sep {
        return;
    }
    for id in layer {
        if let Some(p) = placed.get_mut(id) {
            p.cross += shift;
        }
    }
}

// ─── Layout result ───────────────────────────────────────────────────────────

/// Full output of one layout run. `positions` is what the store consumes;
/// the rest describes how the run ranked the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub positions: Positions,
    pub ranks: BTreeMap<NodeId, usize>,
    pub rank_count: usize,
    /// Edges pointed against the flow to break cycles.
    pub reversed_edges: usize,
    /// Edges ignored because an endpoint was missing.
    pub skipped_edges: usize,
}

// ─── SugiyamaLayout Engine ───────────────────────────────────────────────────

/// Sugiyama layered layout engine. Holds only configuration.
#[derive(Debug, Clone, Default)]
pub struct SugiyamaLayout {
    config: LayoutConfig,
}

impl SugiyamaLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run the full pipeline on a fresh snapshot of `nodes` and `edges`.
    pub fn run(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> LayoutResult {
        let lg = LayoutGraph::from_elements(nodes, edges, &self.config);
        let ag = adj_from_layout_graph(&lg);
        // Greedy FAS reverses nothing on an acyclic snapshot.
        let (dag, reversed_count) = if lg.is_dag() {
            (ag, 0)
        } else {
            let (dag, reversed) = remove_cycles(&ag);
            (dag, reversed.len())
        };
        let la = LayerAssignment::assign(&dag);
        let aug = insert_dummy_nodes(&dag, &la);
        let ordering = minimise_crossings(&aug, self.config.crossing_passes);

        let sizes: HashMap<&str, Size> = lg
            .digraph
            .node_indices()
            .map(|idx| (lg.digraph[idx].id.as_str(), lg.digraph[idx].size))
            .collect();
        let horizontal = direction.is_horizontal();
        // (breadth, depth) in the top-to-bottom frame; dummies take no room.
        let frame_size = |id: &str| -> (f64, f64) {
            match sizes.get(id) {
                Some(s) if horizontal => (s.height, s.width),
                Some(s) => (s.width, s.height),
                None => (0.0, 0.0),
            }
        };
        let placed = assign_coordinates(&ordering, &aug, &frame_size, &self.config);

        let mut positions = Positions::new();
        let mut ranks = BTreeMap::new();
        for idx in lg.digraph.node_indices() {
            let id = &lg.digraph[idx].id;
            let Some(p) = placed.get(id) else { continue };
            let left = p.cross - p.breadth / 2.0;
            let top = p.rank - p.depth / 2.0;
            let position = if horizontal {
                Position::new(top, left)
            } else {
                Position::new(left, top)
            };
            positions.insert(id.clone(), position);
            ranks.insert(id.clone(), p.layer);
        }

        info!(
            direction = direction.code(),
            nodes = lg.node_count(),
            edges = lg.edge_count(),
            ranks = la.layer_count,
            dummies = aug.dummy_count,
            reversed = reversed_count,
            "layout complete"
        );

        LayoutResult {
            positions,
            ranks,
            rank_count: la.layer_count,
            reversed_edges: reversed_count,
            skipped_edges: lg.skipped_edges.len(),
        }
    }
}

impl LayoutEngine for SugiyamaLayout {
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Positions {
        self.run(nodes, edges, direction).positions
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_sugiyama.rs"]
mod tests;
