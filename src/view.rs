//! View-only state: canvas size, panel visibility, the node form draft.
//!
//! Nothing here touches graph data.

use serde::Serialize;

use crate::config::ViewConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CanvasSize {
    Windowed { width: u32, height: u32 },
    Full,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub fullscreen: bool,
    pub show_controls: bool,
    pub show_minimap: bool,
    /// Pending text of the node-creation form.
    pub draft: String,
    windowed: (u32, u32),
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            fullscreen: false,
            show_controls: config.show_controls,
            show_minimap: config.show_minimap,
            draft: String::new(),
            windowed: (config.windowed_width, config.windowed_height),
        }
    }

    pub fn canvas_size(&self) -> CanvasSize {
        if self.fullscreen {
            CanvasSize::Full
        } else {
            CanvasSize::Windowed {
                width: self.windowed.0,
                height: self.windowed.1,
            }
        }
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    pub fn toggle_controls(&mut self) -> bool {
        self.show_controls = !self.show_controls;
        self.show_controls
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.show_minimap = !self.show_minimap;
        self.show_minimap
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_view.rs"]
mod tests;
