//! Editor configuration.
//!
//! Three sections, each with defaults matching the browser editor:
//! `store` (node placement, ingestion checks), `layout` (node box and spacing),
//! `view` (canvas size, panels, delete key). Every field is optional in a
//! JSON config file.

use std::path::Path;

use serde::Deserialize;

use crate::error::EditorError;
use crate::model::types::ConnectionSides;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub store: StoreConfig,
    pub layout: LayoutConfig,
    pub view: ViewConfig,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(src: &str) -> Result<Self, EditorError> {
        let config: EditorConfig = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<(), EditorError> {
        let l = &self.layout;
        if !(l.node_width > 0.0 && l.node_height > 0.0) {
            return Err(EditorError::Config(
                "layout.node_width and layout.node_height must be positive".to_string(),
            ));
        }
        if l.node_sep < 0.0 || l.rank_sep <= 0.0 {
            return Err(EditorError::Config(
                "layout.rank_sep must be positive and layout.node_sep non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Graph Store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Horizontal distance between a newly added node and the previous last node.
    pub node_offset: f64,
    /// Drop ingested edges whose endpoints do not exist.
    pub validate_edges: bool,
    pub connection_sides: ConnectionSides,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            node_offset: 100.0,
            validate_edges: false,
            connection_sides: ConnectionSides::default(),
        }
    }
}

/// Layered layout settings, in layout units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Box used for nodes without a measured size.
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbouring nodes in one rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Upper bound on barycenter sweeps.
    pub crossing_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 172.0,
            node_height: 36.0,
            node_sep: 50.0,
            rank_sep: 50.0,
            crossing_passes: 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub windowed_width: u32,
    pub windowed_height: u32,
    /// Key name that deletes the current selection.
    pub delete_key: String,
    pub show_controls: bool,
    pub show_minimap: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            windowed_width: 800,
            windowed_height: 400,
            delete_key: "Delete".to_string(),
            show_controls: true,
            show_minimap: true,
        }
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_config.rs"]
mod tests;
