//! API schema types for request parsing and responses.
//!
//! Graph, tree and Venn payloads reuse the serializable types of
//! `pathfuse-core` and `pathfuse-analysis` directly.

pub mod catalog;
pub mod paths;
pub mod query;
