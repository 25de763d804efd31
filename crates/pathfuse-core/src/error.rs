//! Core error types for pathfuse-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! decoding, export and parsing failures in the core graph data model.

use thiserror::Error;

/// Core errors produced by the pathfuse-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored graph blob does not match the expected binary layout.
    #[error("corrupt graph blob: {reason}")]
    CorruptBlob { reason: String },

    /// The requested export format is not one of the supported formats.
    #[error("unsupported export format: '{format}'")]
    UnsupportedFormat { format: String },

    /// Encoding a graph failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Writing an export payload failed.
    #[error("export failed: {reason}")]
    Export { reason: String },

    /// A string could not be parsed as a node signature.
    #[error("invalid node signature: '{value}'")]
    InvalidSignature { value: String },

    /// A string is not part of the relation vocabulary.
    #[error("unknown relation: '{value}'")]
    UnknownRelation { value: String },
}

impl CoreError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        CoreError::CorruptBlob {
            reason: reason.into(),
        }
    }
}
