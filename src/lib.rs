//! flowboard: node-and-edge diagram editor core.
//!
//! A `GraphStore` holds the nodes and edges a user builds up (add, connect,
//! drag, delete); a `LayoutEngine` recomputes every node position on demand
//! so the diagram reads as a top-to-bottom or left-to-right hierarchy.
//! `DiagramEditor` ties both to the interaction state machine and the view
//! state a rendering surface needs.
//!
//! Public API: `DiagramEditor`, `GraphStore`, `layout()`.

pub mod config;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod script;
pub mod store;
pub mod view;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::{DiagramEditor, Snapshot};
pub use error::EditorError;
pub use layout::{LayoutEngine, SugiyamaLayout, layout};
pub use model::types::{Connection, Direction, Edge, EdgeId, Node, NodeId, Position, Positions};
pub use store::GraphStore;

/// Replay a command script on a fresh editor (seeded with the preset
/// diagram when `sample` is set) and return the editor.
pub fn replay_script(
    src: &str,
    config: EditorConfig,
    sample: bool,
) -> Result<(DiagramEditor, script::Replay), EditorError> {
    let lines = script::parse(src)?;
    let mut editor = if sample {
        DiagramEditor::sample(config)
    } else {
        DiagramEditor::new(config)
    };
    let replay = script::run(&mut editor, &lines)?;
    Ok((editor, replay))
}
