//! Graph Store: the authoritative node and edge collections.
//!
//! Nodes and edges are kept in insertion order (the rendering surface draws
//! them in that order) with an id → slot index beside each list. Every
//! mutation leaves the store in a state where the invariants hold again:
//! ids are unique, and deleting a node deletes every edge that names it.
//!
//! Dangling edges (an endpoint that names no node) can still enter through
//! `add_edge`, which is unchecked; they are tolerated, reported by
//! `dangling_edges()` and skipped by the layout engine.

pub mod changes;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::model::types::{
    Connection, Edge, EdgeId, EdgeStyle, Node, NodeId, Position, Positions, Size,
};

pub use changes::{EdgeChange, NodeChange};

/// What a deletion actually removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<NodeId, usize>,
    edge_index: HashMap<EdgeId, usize>,
    /// Next id handed out by `add_node`. Only ever grows.
    next_id: u64,
    config: StoreConfig,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl GraphStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            next_id: 1,
            config,
        }
    }

    /// The three-node preset diagram the editor opens with.
    pub fn sample(config: StoreConfig) -> Self {
        let mut store = Self::new(config);
        let labels = [
            "the integral, is the area under the graph of h(r) vs r",
            "the line intersects at time B",
            "the slopes are the same at time A",
        ];
        for (i, label) in labels.iter().enumerate() {
            let id = (i + 1).to_string();
            let mut node = Node::new(id, *label, Position::new(200.0 * i as f64, 0.0));
            node.connection_sides = store.config.connection_sides;
            store.insert_node(node);
        }
        store.add_edge("1", "2");
        store.add_edge("2", "3");
        store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Current position of every node, keyed by id.
    pub fn positions(&self) -> Positions {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect()
    }

    /// Edges with at least one endpoint that names no node.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.source) || !self.contains_node(&e.target))
            .collect()
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect()
    }

    // ── Node mutation ────────────────────────────────────────────────────────

    /// Append a node labelled `label` and return its id.
    ///
    /// The node lands `node_offset` units right of the current last node, on
    /// y = 0 (or at the origin when the store is empty).
    pub fn add_node(&mut self, label: &str) -> NodeId {
        let id = self.next_id.to_string();
        let position = match self.nodes.last() {
            Some(last) => Position::new(last.position.x + self.config.node_offset, 0.0),
            None => Position::default(),
        };
        let mut node = Node::new(id.clone(), label, position);
        node.connection_sides = self.config.connection_sides;
        debug!(id = %id, x = position.x, "add node");
        self.insert_node(node);
        id
    }

    /// Insert an externally built node. An existing node with the same id is
    /// replaced in place. Returns true when a node was replaced.
    pub fn insert_node(&mut self, node: Node) -> bool {
        self.observe_id(&node.id);
        match self.node_index.get(&node.id) {
            Some(&slot) => {
                debug!(id = %node.id, "replace node");
                self.nodes[slot] = node;
                true
            }
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
                false
            }
        }
    }

    /// Overwrite positions. Ids without a node are ignored.
    /// Returns how many nodes moved.
    pub fn update_positions(&mut self, patch: &Positions) -> usize {
        let mut applied = 0;
        for (id, position) in patch {
            match self.node_index.get(id) {
                Some(&slot) => {
                    self.nodes[slot].position = *position;
                    applied += 1;
                }
                None => debug!(id = %id, "position for unknown node ignored"),
            }
        }
        applied
    }

    pub fn set_node_size(&mut self, id: &str, size: Size) -> bool {
        match self.node_index.get(id) {
            Some(&slot) => {
                self.nodes[slot].size = Some(size);
                true
            }
            None => false,
        }
    }

    // ── Edge mutation ────────────────────────────────────────────────────────

    /// Connect `source` to `target` with the fixed edge style (smoothstep,
    /// stroke 1.5, corner radius 20, closed arrowhead).
    ///
    /// Endpoints are not checked. Connecting the same pair again replaces the
    /// previous edge, so there is never more than one edge per id.
    pub fn add_edge(&mut self, source: &str, target: &str) -> EdgeId {
        let edge = Edge::new(source, target, EdgeStyle::default());
        let id = edge.id.clone();
        debug!(id = %id, "add edge");
        self.put_edge(edge);
        id
    }

    pub fn connect(&mut self, connection: &Connection) -> EdgeId {
        self.add_edge(&connection.source, &connection.target)
    }

    /// Insert an externally built edge, keeping its own style and label.
    ///
    /// With `validate_edges` set, an edge naming a missing node is dropped and
    /// `None` is returned.
    pub fn insert_edge(&mut self, edge: Edge) -> Option<EdgeId> {
        if self.config.validate_edges
            && (!self.contains_node(&edge.source) || !self.contains_node(&edge.target))
        {
            warn!(id = %edge.id, source = %edge.source, target = %edge.target, "dropping dangling edge");
            return None;
        }
        let id = edge.id.clone();
        self.put_edge(edge);
        Some(id)
    }

    /// Remove every dangling edge. Returns how many were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.edges.len();
        let node_index = &self.node_index;
        self.edges
            .retain(|e| node_index.contains_key(&e.source) && node_index.contains_key(&e.target));
        let removed = before - self.edges.len();
        if removed > 0 {
            warn!(removed, "pruned dangling edges");
            self.reindex_edges();
        }
        removed
    }

    fn put_edge(&mut self, edge: Edge) {
        match self.edge_index.get(&edge.id) {
            Some(&slot) => self.edges[slot] = edge,
            None => {
                self.edge_index.insert(edge.id.clone(), self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    // ── Deletion ─────────────────────────────────────────────────────────────

    /// Remove the named nodes and edges, plus every edge touching a removed node.
    pub fn delete_selection(
        &mut self,
        node_ids: &HashSet<NodeId>,
        edge_ids: &HashSet<EdgeId>,
    ) -> Removal {
        let mut removal = Removal::default();

        if !node_ids.is_empty() {
            self.nodes.retain(|n| {
                let drop = node_ids.contains(&n.id);
                if drop {
                    removal.nodes.push(n.id.clone());
                }
                !drop
            });
        }

        self.edges.retain(|e| {
            let drop = edge_ids.contains(&e.id)
                || node_ids.contains(&e.source)
                || node_ids.contains(&e.target);
            if drop {
                removal.edges.push(e.id.clone());
            }
            !drop
        });

        if !removal.nodes.is_empty() {
            self.reindex_nodes();
        }
        if !removal.edges.is_empty() {
            self.reindex_edges();
        }
        debug!(
            nodes = removal.nodes.len(),
            edges = removal.edges.len(),
            "delete selection"
        );
        removal
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn select_node(&mut self, id: &str, selected: bool) -> bool {
        match self.node_index.get(id) {
            Some(&slot) => {
                self.nodes[slot].selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_edge(&mut self, id: &str, selected: bool) -> bool {
        match self.edge_index.get(id) {
            Some(&slot) => {
                self.edges[slot].selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        for n in &mut self.nodes {
            n.selected = false;
        }
        for e in &mut self.edges {
            e.selected = false;
        }
    }

    // ── Rendering-surface changes ────────────────────────────────────────────

    /// Fold a batch of node changes in order. A removal takes effect before
    /// the next change, so `[Remove x, Add x]` leaves x in place.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        for change in changes {
            match change {
                NodeChange::Add { item } | NodeChange::Replace { item } => {
                    self.insert_node(item);
                }
                NodeChange::Remove { id } => {
                    self.delete_selection(&HashSet::from([id]), &HashSet::new());
                }
                NodeChange::Position {
                    id,
                    position,
                    dragging,
                } => {
                    if let Some(&slot) = self.node_index.get(&id) {
                        let node = &mut self.nodes[slot];
                        if let Some(p) = position {
                            node.position = p;
                        }
                        node.dragging = dragging;
                    }
                }
                NodeChange::Dimensions { id, size } => {
                    self.set_node_size(&id, size);
                }
                NodeChange::Select { id, selected } => {
                    self.select_node(&id, selected);
                }
            }
        }
    }

    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        for change in changes {
            match change {
                EdgeChange::Add { item } | EdgeChange::Replace { item } => {
                    self.insert_edge(item);
                }
                EdgeChange::Remove { id } => {
                    self.delete_selection(&HashSet::new(), &HashSet::from([id]));
                }
                EdgeChange::Select { id, selected } => {
                    self.select_edge(&id, selected);
                }
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn observe_id(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.next_id = self.next_id.max(n.saturating_add(1));
        }
    }

    fn reindex_nodes(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    fn reindex_edges(&mut self) {
        self.edge_index = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_store.rs"]
mod tests;
