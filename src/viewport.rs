//! Viewport fitting.
//!
//! A layout run only marks a fit as pending. The rendering surface drains
//! the request on its next frame, and bounds are computed from the positions
//! the store holds at that moment, so a fit never sees pre-layout
//! coordinates.

use serde::Serialize;

use crate::model::types::{Node, Size};

pub const FIT_PADDING: f64 = 0.1;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

/// Axis-aligned box in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Smallest box containing every node. Nodes without a measured size
    /// count as `default_size`. None for an empty slice.
    pub fn of_nodes(nodes: &[Node], default_size: Size) -> Option<Self> {
        let mut iter = nodes.iter().map(|n| {
            let size = n.size.unwrap_or(default_size);
            (
                n.position.x,
                n.position.y,
                n.position.x + size.width,
                n.position.y + size.height,
            )
        });
        let first = iter.next()?;
        let (x0, y0, x1, y1) = iter.fold(first, |(ax0, ay0, ax1, ay1), (bx0, by0, bx1, by1)| {
            (ax0.min(bx0), ay0.min(by0), ax1.max(bx1), ay1.max(by1))
        });
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Pan offset and zoom of the visible canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Viewport that centres `bounds` in a `width` x `height` canvas with a
    /// relative `padding` margin, zoom clamped to [MIN_ZOOM, MAX_ZOOM].
    pub fn fit(bounds: &Bounds, width: f64, height: f64, padding: f64) -> Self {
        let pad = 1.0 + padding.max(0.0) * 2.0;
        let zoom_x = if bounds.width > 0.0 {
            width / (bounds.width * pad)
        } else {
            MAX_ZOOM
        };
        let zoom_y = if bounds.height > 0.0 {
            height / (bounds.height * pad)
        } else {
            MAX_ZOOM
        };
        let zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);
        let (cx, cy) = bounds.center();
        Self {
            x: width / 2.0 - cx * zoom,
            y: height / 2.0 - cy * zoom,
            zoom,
        }
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_viewport.rs"]
mod tests;
