//! Layout engine: computes node positions from the current topology.
//!
//! The editor only depends on the `LayoutEngine` contract; `SugiyamaLayout`
//! is the engine it ships with.

pub mod graph;
pub mod sugiyama;

pub use graph::LayoutGraph;
pub use sugiyama::{LayoutResult, SugiyamaLayout};

use crate::model::types::{Direction, Edge, Node, Positions};

/// A hierarchical layout capability.
///
/// Implementations must be deterministic, place every node (isolated ones
/// included), terminate on cyclic input, and keep no node or edge state
/// between calls. They return positions only; ids, labels and topology are
/// the caller's.
pub trait LayoutEngine {
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Positions;
}

/// Lay out with the default Sugiyama engine and configuration.
pub fn layout(nodes: &[Node], edges: &[Edge], direction: Direction) -> Positions {
    SugiyamaLayout::default().layout(nodes, edges, direction)
}
