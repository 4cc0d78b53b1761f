//! Error types for the structural engine

use thiserror::Error;

use crate::elements::NodeId;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid topology: expected {expected}, found {found} nodes")]
    InvalidTopology { expected: String, found: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Node {0} not found in mesh")]
    NodeNotFound(NodeId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl EngineError {
    /// Shorthand for a node-count mismatch on a mesh request
    pub fn topology(expected: impl Into<String>, found: usize) -> Self {
        Self::InvalidTopology {
            expected: expected.into(),
            found,
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
