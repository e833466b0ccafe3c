//! WASM bindings for flowboard.
//!
//! Exposes a `FlowEditor` class to JavaScript via wasm-bindgen. The browser
//! surface renders from `snapshot()` after every call and drains
//! `takeFitRequest()` on its next animation frame.

use std::collections::HashSet;

use wasm_bindgen::prelude::*;

use crate::editor::DiagramEditor;
use crate::model::types::{Direction, Position};
use crate::store::{EdgeChange, NodeChange};
use crate::viewport::{FIT_PADDING, Viewport};
use crate::{EditorConfig, EditorError};

fn js_err(e: EditorError) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct FlowEditor {
    inner: DiagramEditor,
}

#[wasm_bindgen]
impl FlowEditor {
    /// Create an editor. `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, sample: bool) -> Result<FlowEditor, JsError> {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json_str(config_json).map_err(js_err)?
        };
        let inner = if sample {
            DiagramEditor::sample(config)
        } else {
            DiagramEditor::new(config)
        };
        Ok(FlowEditor { inner })
    }

    /// Submit the node form with `text`. Rejects empty text.
    #[wasm_bindgen(js_name = "addNode")]
    pub fn add_node(&mut self, text: &str) -> Result<String, JsError> {
        self.inner.set_draft(text);
        self.inner.submit_draft().map_err(js_err)
    }

    pub fn connect(&mut self, source: &str, target: &str) -> String {
        self.inner.connect(source, target)
    }

    /// Remove nodes and edges by id, plus every edge touching a removed node.
    #[wasm_bindgen(js_name = "deleteSelection")]
    pub fn delete_selection(&mut self, node_ids: Vec<String>, edge_ids: Vec<String>) {
        let nodes: HashSet<String> = node_ids.into_iter().collect();
        let edges: HashSet<String> = edge_ids.into_iter().collect();
        self.inner.delete_selection(&nodes, &edges);
    }

    /// Replace the selection. The delete key then removes it.
    #[wasm_bindgen(js_name = "selectElements")]
    pub fn select_elements(&mut self, node_ids: Vec<String>, edge_ids: Vec<String>) {
        self.inner.select(node_ids, edge_ids);
    }

    #[wasm_bindgen(js_name = "moveNode")]
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.inner.move_node(id, Position::new(x, y))
    }

    /// Fold a JSON array of node changes from the rendering surface.
    #[wasm_bindgen(js_name = "onNodesChange")]
    pub fn on_nodes_change(&mut self, changes_json: &str) -> Result<(), JsError> {
        let changes: Vec<NodeChange> =
            serde_json::from_str(changes_json).map_err(|e| js_err(e.into()))?;
        self.inner.on_nodes_change(changes);
        Ok(())
    }

    #[wasm_bindgen(js_name = "onEdgesChange")]
    pub fn on_edges_change(&mut self, changes_json: &str) -> Result<(), JsError> {
        let changes: Vec<EdgeChange> =
            serde_json::from_str(changes_json).map_err(|e| js_err(e.into()))?;
        self.inner.on_edges_change(changes);
        Ok(())
    }

    #[wasm_bindgen(js_name = "handleKey")]
    pub fn handle_key(&mut self, key: &str) {
        self.inner.handle_key(key);
    }

    /// Lay out with "TB" or "LR". Returns how many nodes moved.
    pub fn layout(&mut self, direction: &str) -> Result<usize, JsError> {
        let direction = Direction::parse(direction).map_err(js_err)?;
        Ok(self.inner.layout(direction))
    }

    /// Current nodes and edges as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        self.inner.snapshot_json(false).map_err(js_err)
    }

    /// Drain a pending fit as a `{x, y, zoom}` JSON viewport for a canvas of
    /// `width` x `height` pixels. Empty string when nothing is pending.
    #[wasm_bindgen(js_name = "takeFitRequest")]
    pub fn take_fit_request(&mut self, width: f64, height: f64) -> Result<String, JsError> {
        match self.inner.take_fit_request() {
            Some(bounds) => {
                let viewport = Viewport::fit(&bounds, width, height, FIT_PADDING);
                serde_json::to_string(&viewport).map_err(|e| js_err(e.into()))
            }
            None => Ok(String::new()),
        }
    }
}
