//! Command scripts: a line-per-action replay of what a user does in the
//! editor. The CLI feeds scripts through `run` to drive a `DiagramEditor`
//! without a browser.
//!
//! ```text
//! # comments and blank lines are skipped
//! add Start here
//! add "quoted label"
//! connect 1 2            (or: connect 1 -> 2)
//! move 2 40 80
//! select nodes 1 edges e1-2
//! key Delete
//! delete nodes 3 edges e1-2
//! layout TB              (TB | LR)
//! toggle minimap         (fullscreen | controls | minimap)
//! fit
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::editor::DiagramEditor;
use crate::error::EditorError;
use crate::layout::LayoutEngine;
use crate::model::types::{Direction, EdgeId, NodeId, Position};
use crate::viewport::Bounds;

static ADD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^add\s+(.+)$").expect("valid regex"));
static CONNECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^connect\s+(\S+)\s+(?:->\s+)?(\S+)$").expect("valid regex"));
static SELECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(delete|select)(?:\s+(.*))?$").expect("valid regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^move\s+(\S+)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)$").expect("valid regex")
});
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^key\s+(\S+)$").expect("valid regex"));
static LAYOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^layout\s+(\S+)$").expect("valid regex"));
static TOGGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^toggle\s+(fullscreen|controls|minimap)$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Fullscreen,
    Controls,
    Minimap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    Connect(NodeId, NodeId),
    Delete { nodes: Vec<NodeId>, edges: Vec<EdgeId> },
    Select { nodes: Vec<NodeId>, edges: Vec<EdgeId> },
    Move(NodeId, Position),
    Key(String),
    Layout(Direction),
    Toggle(Toggle),
    Fit,
}

/// A parsed command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub command: Command,
}

/// Parse a whole script. Fails on the first line that is not a command.
pub fn parse(src: &str) -> Result<Vec<Line>, EditorError> {
    let mut lines = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let number = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let command = parse_command(text).map_err(|msg| EditorError::script(number, msg))?;
        lines.push(Line { number, command });
    }
    Ok(lines)
}

fn parse_command(text: &str) -> Result<Command, String> {
    if let Some(caps) = ADD_RE.captures(text) {
        return Ok(Command::Add(unquote(&caps[1]).to_string()));
    }
    if let Some(caps) = CONNECT_RE.captures(text) {
        return Ok(Command::Connect(caps[1].to_string(), caps[2].to_string()));
    }
    if let Some(caps) = SELECTION_RE.captures(text) {
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let (nodes, edges) = parse_selection(rest)?;
        return Ok(if &caps[1] == "delete" {
            Command::Delete { nodes, edges }
        } else {
            Command::Select { nodes, edges }
        });
    }
    if let Some(caps) = MOVE_RE.captures(text) {
        let x: f64 = caps[2].parse().map_err(|_| format!("bad x coordinate '{}'", &caps[2]))?;
        let y: f64 = caps[3].parse().map_err(|_| format!("bad y coordinate '{}'", &caps[3]))?;
        return Ok(Command::Move(caps[1].to_string(), Position::new(x, y)));
    }
    if let Some(caps) = KEY_RE.captures(text) {
        return Ok(Command::Key(caps[1].to_string()));
    }
    if let Some(caps) = LAYOUT_RE.captures(text) {
        let direction = Direction::parse(&caps[1]).map_err(|e| e.to_string())?;
        return Ok(Command::Layout(direction));
    }
    if let Some(caps) = TOGGLE_RE.captures(text) {
        let toggle = match &caps[1] {
            "fullscreen" => Toggle::Fullscreen,
            "controls" => Toggle::Controls,
            _ => Toggle::Minimap,
        };
        return Ok(Command::Toggle(toggle));
    }
    if text == "fit" {
        return Ok(Command::Fit);
    }
    Err(format!("unrecognised command '{text}'"))
}

/// `nodes a b edges x y` in either order; each keyword at most once.
fn parse_selection(rest: &str) -> Result<(Vec<NodeId>, Vec<EdgeId>), String> {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut into_nodes: Option<bool> = None;
    let mut seen: HashSet<&str> = HashSet::new();
    for token in rest.split_whitespace() {
        match token {
            "nodes" | "edges" => {
                if !seen.insert(token) {
                    return Err(format!("'{token}' given twice"));
                }
                into_nodes = Some(token == "nodes");
            }
            id => match into_nodes {
                Some(true) => nodes.push(id.to_string()),
                Some(false) => edges.push(id.to_string()),
                None => return Err(format!("expected 'nodes' or 'edges' before '{id}'")),
            },
        }
    }
    Ok((nodes, edges))
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// What a replay produced besides the edited graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replay {
    pub commands: usize,
    pub layouts: usize,
    /// Bounds from each `fit` line that found a pending fit.
    pub fits: Vec<Bounds>,
}

/// Apply parsed lines to `editor` in order.
pub fn run<E: LayoutEngine>(
    editor: &mut DiagramEditor<E>,
    lines: &[Line],
) -> Result<Replay, EditorError> {
    let mut replay = Replay::default();
    for line in lines {
        debug!(line = line.number, command = ?line.command, "replay");
        match &line.command {
            Command::Add(label) => {
                editor.set_draft(label);
                editor.submit_draft().map_err(|e| EditorError::script(line.number, e.to_string()))?;
            }
            Command::Connect(source, target) => {
                editor.connect(source, target);
            }
            Command::Delete { nodes, edges } => {
                let nodes: HashSet<NodeId> = nodes.iter().cloned().collect();
                let edges: HashSet<EdgeId> = edges.iter().cloned().collect();
                editor.delete_selection(&nodes, &edges);
            }
            Command::Select { nodes, edges } => {
                editor.select(nodes.clone(), edges.clone());
            }
            Command::Move(id, position) => {
                editor.move_node(id, *position);
            }
            Command::Key(key) => {
                editor.handle_key(key);
            }
            Command::Layout(direction) => {
                editor.layout(*direction);
                replay.layouts += 1;
            }
            Command::Toggle(toggle) => {
                let view = editor.view_mut();
                match toggle {
                    Toggle::Fullscreen => view.toggle_fullscreen(),
                    Toggle::Controls => view.toggle_controls(),
                    Toggle::Minimap => view.toggle_minimap(),
                };
            }
            Command::Fit => {
                if let Some(bounds) = editor.take_fit_request() {
                    replay.fits.push(bounds);
                }
            }
        }
        replay.commands += 1;
    }
    Ok(replay)
}

#[cfg(test)]
#[path = "../tests/rust/test_script.rs"]
mod tests;
