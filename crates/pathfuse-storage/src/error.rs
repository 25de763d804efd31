//! Storage error types for pathfuse-storage.

use pathfuse_core::CoreError;
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No pathway is stored under the given identifier and resource.
    #[error("pathway not found: {pathway_id} ({resource})")]
    PathwayNotFound { pathway_id: String, resource: String },

    /// A pathway with the same identifier and resource already exists.
    #[error("pathway already exists: {pathway_id} ({resource})")]
    DuplicatePathway { pathway_id: String, resource: String },

    /// A manager was asked to import a pathway belonging to another resource.
    #[error("resource mismatch: manager for '{expected}' cannot import into '{found}'")]
    ResourceMismatch { expected: String, found: String },

    /// No manager is registered for the resource.
    #[error("unknown resource: '{resource}'")]
    UnknownResource { resource: String },

    /// Encoding or decoding a graph blob failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
