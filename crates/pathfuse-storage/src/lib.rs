//! Storage for pathway graph blobs.
//!
//! Provides the [`PathwayRepository`] trait, the [`InMemoryStore`] and
//! [`SqliteStore`] backends, and the [`ManagerRegistry`] that maps each
//! resource (source database) to the [`PathwayDataManager`] responsible for
//! it.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: Pathway row and NewPathway insert types
//! - [`traits`]: PathwayRepository trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migration setup for the SQLite backend
//! - [`sqlite`]: SqliteStore implementation
//! - [`registry`]: per-resource data managers

pub mod error;
pub mod memory;
pub mod registry;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use registry::{ManagerRegistry, PathwayDataManager, ResourceManager, DEFAULT_RESOURCES};
pub use sqlite::SqliteStore;
pub use traits::PathwayRepository;
pub use types::{NewPathway, Pathway};
