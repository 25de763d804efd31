//! Analysis passes over pathway graphs.
//!
//! Everything here is synchronous and request-scoped: each call builds its
//! own graphs from stored blobs and never shares mutable state.
//!
//! - [`merge`]: resolve a selection and union the graphs with provenance
//! - [`contradiction`]: flag node pairs with conflicting relations
//! - [`filter`]: annotation filtering and the annotation tree
//! - [`collapse`]: gene-level collapsing
//! - [`paths`]: shortest, all-simple and random paths
//! - [`centrality`]: betweenness ranking
//! - [`overlap`]: per-pathway node sets and Venn records

pub mod centrality;
pub mod collapse;
pub mod contradiction;
pub mod error;
pub mod filter;
pub mod merge;
pub mod overlap;
pub mod paths;

#[cfg(test)]
mod testing;

pub use centrality::{betweenness_centrality, top_betweenness};
pub use collapse::collapse_to_genes;
pub use contradiction::{find_contradictions, label_contradictions, Contradiction, ContradictionKind};
pub use error::AnalysisError;
pub use filter::{annotation_tree, filter_by_annotation, AnnotationFilter, TreeNode};
pub use merge::{merge_pathways, union, PathwaySelection};
pub use overlap::{node_sets_per_pathway, venn_overlap, venn_overlap_up_to, NodeSets, VennRecord};
pub use paths::{all_paths, fallback_path, random_path, shortest_path, AllSimplePaths, PathError};
