// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the editor layer.

use nodify_graph::GraphError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Errors surfaced by the editor
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Graph registry rejected a mutation
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
