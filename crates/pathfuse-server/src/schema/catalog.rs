//! Catalog responses: name suggestions, per-resource counts, bulk delete.

use serde::Serialize;

/// One autocompletion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Pathway name shown to the user.
    pub label: String,
    /// Pathway identifier sent back in `pathways[]`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceCount {
    pub resource: String,
    pub pathways: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub status: u16,
    pub message: String,
    pub deleted: usize,
}
