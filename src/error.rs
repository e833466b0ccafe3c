//! Boundary errors.
//!
//! Store mutations and layout runs never fail; these only surface where
//! outside input enters the editor (form text, direction codes, scripts,
//! config files, snapshot serialisation).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("node label must not be empty")]
    EmptyLabel,

    #[error("unknown direction '{0}'; use TB or LR")]
    UnknownDirection(String),

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        EditorError::Script {
            line,
            message: message.into(),
        }
    }
}
