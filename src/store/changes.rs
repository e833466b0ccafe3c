//! Change events emitted by the rendering surface.
//!
//! The surface never mutates the graph itself; it reports what the user did
//! (dragged, resized, selected, removed) and the store folds each change into
//! its collections.

use serde::{Deserialize, Serialize};

use crate::model::types::{Edge, EdgeId, Node, NodeId, Position, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    Add {
        item: Node,
    },
    Replace {
        item: Node,
    },
    Remove {
        id: NodeId,
    },
    /// Drag progress. `position` is absent on the final drag-end event.
    Position {
        id: NodeId,
        #[serde(default)]
        position: Option<Position>,
        #[serde(default)]
        dragging: bool,
    },
    Dimensions {
        id: NodeId,
        size: Size,
    },
    Select {
        id: NodeId,
        selected: bool,
    },
}

impl NodeChange {
    pub fn id(&self) -> &str {
        match self {
            NodeChange::Add { item } | NodeChange::Replace { item } => &item.id,
            NodeChange::Remove { id }
            | NodeChange::Position { id, .. }
            | NodeChange::Dimensions { id, .. }
            | NodeChange::Select { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Add { item: Edge },
    Replace { item: Edge },
    Remove { id: EdgeId },
    Select { id: EdgeId, selected: bool },
}

impl EdgeChange {
    pub fn id(&self) -> &str {
        match self {
            EdgeChange::Add { item } | EdgeChange::Replace { item } => &item.id,
            EdgeChange::Remove { id } | EdgeChange::Select { id, .. } => id,
        }
    }
}
