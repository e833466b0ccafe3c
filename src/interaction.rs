//! Connection and deletion state machine.
//!
//! ```text
//! Idle ──ConnectStart──▶ Connecting ──ConnectEnd(Some)──▶ Idle + Connect
//!                                   └─ConnectEnd(None)──▶ Idle
//! Idle ──Select──▶ Selected ──DeleteKey──▶ Idle + Delete
//!                           └─PaneClick──▶ Idle + ClearSelection
//! ```
//!
//! The machine only decides; `DiagramEditor` applies the returned `Effect`
//! to the store.

use std::collections::BTreeSet;

use crate::model::types::{Connection, EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// A connection line is being dragged out of `source`.
    Connecting { source: NodeId },
    Selected {
        nodes: BTreeSet<NodeId>,
        edges: BTreeSet<EdgeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    ConnectStart { source: NodeId },
    /// Pointer released over `target`, or over empty space when None.
    ConnectEnd { target: Option<NodeId> },
    Select {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    DeleteKey,
    PaneClick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Connect(Connection),
    Select {
        nodes: BTreeSet<NodeId>,
        edges: BTreeSet<EdgeId>,
    },
    ClearSelection,
    Delete {
        nodes: BTreeSet<NodeId>,
        edges: BTreeSet<EdgeId>,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn handle(&mut self, event: InteractionEvent) -> Effect {
        let state = std::mem::take(self);
        let (next, effect) = match (state, event) {
            (_, InteractionEvent::ConnectStart { source }) => {
                (Interaction::Connecting { source }, Effect::None)
            }
            (Interaction::Connecting { source }, InteractionEvent::ConnectEnd { target }) => {
                match target {
                    Some(target) => (
                        Interaction::Idle,
                        Effect::Connect(Connection { source, target }),
                    ),
                    None => (Interaction::Idle, Effect::None),
                }
            }
            (state, InteractionEvent::ConnectEnd { .. }) => (state, Effect::None),
            (state, InteractionEvent::Select { nodes, edges }) => {
                let nodes: BTreeSet<NodeId> = nodes.into_iter().collect();
                let edges: BTreeSet<EdgeId> = edges.into_iter().collect();
                if nodes.is_empty() && edges.is_empty() {
                    let effect = if matches!(state, Interaction::Selected { .. }) {
                        Effect::ClearSelection
                    } else {
                        Effect::None
                    };
                    (Interaction::Idle, effect)
                } else {
                    (
                        Interaction::Selected {
                            nodes: nodes.clone(),
                            edges: edges.clone(),
                        },
                        Effect::Select { nodes, edges },
                    )
                }
            }
            (Interaction::Selected { nodes, edges }, InteractionEvent::DeleteKey) => {
                (Interaction::Idle, Effect::Delete { nodes, edges })
            }
            (state, InteractionEvent::DeleteKey) => (state, Effect::None),
            (Interaction::Selected { .. }, InteractionEvent::PaneClick) => {
                (Interaction::Idle, Effect::ClearSelection)
            }
            (_, InteractionEvent::PaneClick) => (Interaction::Idle, Effect::None),
        };
        *self = next;
        effect
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_interaction.rs"]
mod tests;
