//! Core data model for pathway graph fusion.
//!
//! A pathway is a directed multigraph of biological entities ([`Node`]) linked
//! by typed relations ([`EdgeData`]). This crate owns the value types, the
//! [`PathwayGraph`] container, provenance annotation, the binary blob codec
//! and the export formats. Analysis passes live in `pathfuse-analysis`.

pub mod annotation;
pub mod codec;
pub mod edge;
pub mod error;
pub mod export;
pub mod graph;
pub mod id;
pub mod node;

// Re-export commonly used types
pub use edge::{Annotations, Citation, EdgeData, Relation};
pub use error::CoreError;
pub use export::{ExportFormat, Payload};
pub use graph::{EdgeView, GraphMetadata, PathwayGraph};
pub use id::{EdgeKey, NodeSignature};
pub use node::{Entity, Function, Fusion, Node, Variant};
