//! Diagram data structures shared by the store, the layout engine and the
//! rendering surface.
//!
//! Enums (Direction, Side, CurveKind, Arrowhead) and structs (Node, Edge,
//! Position, Size, EdgeStyle, Connection). Field names serialise in the
//! camelCase shape the browser surface consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

pub type NodeId = String;
pub type EdgeId = String;

/// Node id → position, ordered by id so layout output is reproducible.
pub type Positions = BTreeMap<NodeId, Position>;

// ─── Direction ───────────────────────────────────────────────────────────────

/// Flow axis for an automatic layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "LR")]
    LeftToRight,
}

impl Direction {
    /// Parse the short direction codes used by the layout buttons and the CLI.
    pub fn parse(s: &str) -> Result<Self, EditorError> {
        match s.trim().to_uppercase().as_str() {
            "TB" | "TD" | "VERTICAL" => Ok(Direction::TopToBottom),
            "LR" | "HORIZONTAL" => Ok(Direction::LeftToRight),
            _ => Err(EditorError::UnknownDirection(s.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::LeftToRight => "LR",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── Connection sides ────────────────────────────────────────────────────────

/// Side of a node where an edge attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSides {
    pub source: Side,
    pub target: Side,
}

impl Default for ConnectionSides {
    fn default() -> Self {
        Self {
            source: Side::Right,
            target: Side::Left,
        }
    }
}

// ─── Node ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    /// Free text shown inside the node. Never edited after creation.
    pub label: String,
    #[serde(default)]
    pub connection_sides: ConnectionSides,
    /// Measured size reported by the rendering surface, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub dragging: bool,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            label: label.into(),
            connection_sides: ConnectionSides::default(),
            size: None,
            selected: false,
            dragging: false,
        }
    }
}

// ─── Edge style ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Bezier,
    Straight,
    Step,
    #[default]
    SmoothStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrowhead {
    None,
    Open,
    #[default]
    ArrowClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeStyle {
    pub curve: CurveKind,
    pub stroke_width: f64,
    pub arrowhead: Arrowhead,
    pub corner_radius: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            curve: CurveKind::SmoothStep,
            stroke_width: 1.5,
            arrowhead: Arrowhead::ArrowClosed,
            corner_radius: 20.0,
        }
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, style: EdgeStyle) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
            style,
            label: None,
            selected: false,
        }
    }

    /// True if either endpoint is `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// Deterministic edge identifier for a `(source, target)` pair.
pub fn edge_id(source: &str, target: &str) -> EdgeId {
    format!("e{source}-{target}")
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// Endpoints of a user-drawn connection, as chosen by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_model_types.rs"]
mod tests;
