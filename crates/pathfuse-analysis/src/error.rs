//! Analysis error types.

use pathfuse_core::CoreError;
use pathfuse_storage::StorageError;
use thiserror::Error;

/// Errors produced while resolving and merging a selection.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request selected no pathways.
    #[error("no pathways were selected")]
    EmptySelection,

    /// A selected pathway is not stored.
    #[error("pathway \"{pathway_id}\" in resource \"{resource}\" was not found")]
    PathwayNotFound { pathway_id: String, resource: String },

    /// A stored blob could not be decoded.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The repository failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
