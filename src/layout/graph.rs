//! LayoutGraph: the topology snapshot a single layout run works on.
//!
//! Built from the store's node and edge slices at the start of every run and
//! dropped at the end, so nothing from one run can leak into the next.
//! Edges whose endpoints are missing are left out here; the store keeps them.

use std::collections::HashMap;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::warn;

use crate::config::LayoutConfig;
use crate::model::types::{Edge, Node, NodeId, Size};

/// Node data stored in the petgraph DiGraph.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub id: NodeId,
    /// Measured size, or the configured default box.
    pub size: Size,
}

/// Edge data stored in the petgraph DiGraph.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub id: String,
}

pub struct LayoutGraph {
    pub digraph: DiGraph<NodeData, EdgeData>,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: HashMap<NodeId, NodeIndex>,
    /// Edges left out because an endpoint was missing.
    pub skipped_edges: Vec<String>,
}

impl LayoutGraph {
    pub fn from_elements(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Self {
        let mut digraph: DiGraph<NodeData, EdgeData> = DiGraph::new();
        let mut node_index: HashMap<NodeId, NodeIndex> = HashMap::new();
        let mut skipped_edges = Vec::new();

        for node in nodes {
            let size = node
                .size
                .filter(|s| s.width > 0.0 && s.height > 0.0)
                .unwrap_or(Size::new(config.node_width, config.node_height));
            let data = NodeData {
                id: node.id.clone(),
                size,
            };
            // A duplicated id keeps its first slot, with the latest data.
            match node_index.get(&node.id) {
                Some(&idx) => digraph[idx] = data,
                None => {
                    let idx = digraph.add_node(data);
                    node_index.insert(node.id.clone(), idx);
                }
            }
        }

        for edge in edges {
            match (node_index.get(&edge.source), node_index.get(&edge.target)) {
                (Some(&from), Some(&to)) => {
                    digraph.add_edge(
                        from,
                        to,
                        EdgeData {
                            id: edge.id.clone(),
                        },
                    );
                }
                _ => {
                    warn!(id = %edge.id, "edge references a missing node; left out of layout");
                    skipped_edges.push(edge.id.clone());
                }
            }
        }

        Self {
            digraph,
            node_index,
            skipped_edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    /// True if the graph has no directed cycles. Self-loops count as cycles.
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(&self.digraph)
    }

    /// `(source, target)` id pairs in insertion order.
    pub fn edge_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.digraph
            .edge_indices()
            .filter_map(|eidx| self.digraph.edge_endpoints(eidx))
            .map(|(a, b)| (self.digraph[a].id.clone(), self.digraph[b].id.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_graph.rs"]
mod tests;
