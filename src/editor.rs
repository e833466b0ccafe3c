//! DiagramEditor: the store, a layout engine, the interaction state machine
//! and the view state behind one single-threaded API.
//!
//! Every method runs to completion before returning; a layout computes all
//! positions first and writes them to the store in one step.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::interaction::{Effect, Interaction, InteractionEvent};
use crate::layout::{LayoutEngine, SugiyamaLayout};
use crate::model::types::{
    Connection, Direction, Edge, EdgeId, Node, NodeId, Position, Positions, Size,
};
use crate::store::{EdgeChange, GraphStore, NodeChange, Removal};
use crate::view::ViewState;
use crate::viewport::Bounds;

/// The node and edge lists handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

pub struct DiagramEditor<E: LayoutEngine = SugiyamaLayout> {
    store: GraphStore,
    engine: E,
    interaction: Interaction,
    view: ViewState,
    fit_pending: bool,
    config: EditorConfig,
}

impl DiagramEditor<SugiyamaLayout> {
    pub fn new(config: EditorConfig) -> Self {
        let store = GraphStore::new(config.store.clone());
        Self::with_store(store, config)
    }

    /// Editor opened on the preset three-node diagram.
    pub fn sample(config: EditorConfig) -> Self {
        let store = GraphStore::sample(config.store.clone());
        Self::with_store(store, config)
    }

    pub fn with_store(store: GraphStore, config: EditorConfig) -> Self {
        let engine = SugiyamaLayout::new(config.layout.clone());
        Self::with_engine(store, engine, config)
    }
}

impl Default for DiagramEditor<SugiyamaLayout> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<E: LayoutEngine> DiagramEditor<E> {
    pub fn with_engine(store: GraphStore, engine: E, config: EditorConfig) -> Self {
        Self {
            store,
            engine,
            interaction: Interaction::Idle,
            view: ViewState::new(&config.view),
            fit_pending: false,
            config,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.store.nodes().to_vec(),
            edges: self.store.edges().to_vec(),
        }
    }

    pub fn snapshot_json(&self, pretty: bool) -> Result<String, EditorError> {
        let snapshot = self.snapshot();
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }

    // ── Graph edits ──────────────────────────────────────────────────────────

    pub fn add_node(&mut self, label: &str) -> NodeId {
        self.store.add_node(label)
    }

    pub fn connect(&mut self, source: &str, target: &str) -> EdgeId {
        self.store.add_edge(source, target)
    }

    /// Fold a connection reported by the rendering surface.
    pub fn on_connect(&mut self, connection: &Connection) -> EdgeId {
        self.store.connect(connection)
    }

    pub fn delete_selection(&mut self, nodes: &HashSet<NodeId>, edges: &HashSet<EdgeId>) -> Removal {
        self.store.delete_selection(nodes, edges)
    }

    /// Drag a single node to `position`.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        let patch: Positions = [(id.to_string(), position)].into_iter().collect();
        self.store.update_positions(&patch) == 1
    }

    /// Fold node changes from the rendering surface. Selection changes there
    /// also move the interaction state, so the delete key acts on them.
    pub fn on_nodes_change(&mut self, changes: Vec<NodeChange>) {
        self.store.apply_node_changes(changes);
        self.sync_selection();
    }

    pub fn on_edges_change(&mut self, changes: Vec<EdgeChange>) {
        self.store.apply_edge_changes(changes);
        self.sync_selection();
    }

    /// Feed the store's selection flags to the state machine. The store
    /// already holds the selection, so the returned effect is dropped. A
    /// connection in progress is left alone.
    fn sync_selection(&mut self) {
        if matches!(self.interaction, Interaction::Connecting { .. }) {
            return;
        }
        let nodes = self.store.selected_nodes();
        let edges = self.store.selected_edges();
        debug!(nodes = nodes.len(), edges = edges.len(), "surface selection");
        self.interaction.handle(InteractionEvent::Select { nodes, edges });
    }

    // ── Layout ───────────────────────────────────────────────────────────────

    /// Recompute every node position for `direction` and schedule a viewport
    /// fit. Returns how many nodes were positioned.
    pub fn layout(&mut self, direction: Direction) -> usize {
        let positions = self
            .engine
            .layout(self.store.nodes(), self.store.edges(), direction);
        let moved = self.store.update_positions(&positions);
        self.fit_pending = true;
        moved
    }

    pub fn fit_pending(&self) -> bool {
        self.fit_pending
    }

    /// Drain a pending viewport fit. Bounds reflect the positions the store
    /// holds now. Returns None if no fit is pending or the diagram is empty.
    pub fn take_fit_request(&mut self) -> Option<Bounds> {
        if !std::mem::take(&mut self.fit_pending) {
            return None;
        }
        let default_size = Size::new(self.config.layout.node_width, self.config.layout.node_height);
        Bounds::of_nodes(self.store.nodes(), default_size)
    }

    // ── Interaction ──────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: InteractionEvent) -> Effect {
        let effect = self.interaction.handle(event);
        match &effect {
            Effect::None => {}
            Effect::Connect(connection) => {
                self.store.connect(connection);
            }
            Effect::Select { nodes, edges } => {
                self.store.clear_selection();
                for id in nodes {
                    self.store.select_node(id, true);
                }
                for id in edges {
                    self.store.select_edge(id, true);
                }
            }
            Effect::ClearSelection => self.store.clear_selection(),
            Effect::Delete { nodes, edges } => {
                let nodes: HashSet<NodeId> = nodes.iter().cloned().collect();
                let edges: HashSet<EdgeId> = edges.iter().cloned().collect();
                self.store.delete_selection(&nodes, &edges);
            }
        }
        effect
    }

    pub fn select(&mut self, nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Effect {
        self.handle(InteractionEvent::Select { nodes, edges })
    }

    /// Handle a key press. Only the configured delete key does anything.
    pub fn handle_key(&mut self, key: &str) -> Effect {
        if key == self.config.view.delete_key {
            self.handle(InteractionEvent::DeleteKey)
        } else {
            debug!(key, "key ignored");
            Effect::None
        }
    }

    // ── Node form ────────────────────────────────────────────────────────────

    pub fn set_draft(&mut self, text: &str) {
        self.view.draft = text.to_string();
    }

    /// Submit the node form: add a node labelled with the draft text and
    /// clear the draft. Empty text is rejected and leaves the store untouched.
    pub fn submit_draft(&mut self) -> Result<NodeId, EditorError> {
        if self.view.draft.is_empty() {
            return Err(EditorError::EmptyLabel);
        }
        let label = std::mem::take(&mut self.view.draft);
        Ok(self.store.add_node(&label))
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_editor.rs"]
mod tests;
