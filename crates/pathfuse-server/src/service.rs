//! PathwayService: the single coordinator between HTTP handlers and the
//! storage and analysis crates.
//!
//! Every view starts from [`merge_pathways`] on the stored blobs; nothing is
//! cached between calls. Handlers validate input first and only then take
//! the service lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pathfuse_analysis::{
    all_paths, annotation_tree, collapse_to_genes, fallback_path, filter_by_annotation,
    merge_pathways, node_sets_per_pathway, random_path, shortest_path, top_betweenness,
    venn_overlap_up_to, AnnotationFilter, PathError, PathwaySelection, TreeNode, VennRecord,
};
use pathfuse_core::export::export;
use pathfuse_core::{ExportFormat, NodeSignature, PathwayGraph, Payload};
use pathfuse_storage::{ManagerRegistry, NewPathway, Pathway, PathwayRepository, SqliteStore};

use crate::config::{ServerConfig, DEFAULT_OVERLAP_DETAIL_LIMIT};
use crate::error::ApiError;
use crate::schema::catalog::{DeleteResponse, ResourceCount, Suggestion};
use crate::schema::paths::{PathsMethod, PathsRequest, PathsResponse};

/// Maximum number of autocompletion suggestions.
pub const SUGGESTION_LIMIT: usize = 10;

pub struct PathwayService {
    store: SqliteStore,
    registry: Arc<ManagerRegistry>,
    overlap_detail_limit: usize,
    rng: ChaCha8Rng,
}

impl PathwayService {
    /// Opens the SQLite database named in `config`.
    pub fn new(config: &ServerConfig, registry: Arc<ManagerRegistry>) -> Result<Self, ApiError> {
        let store = SqliteStore::new(&config.db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open database: {}", e)))?;
        Ok(PathwayService {
            store,
            registry,
            overlap_detail_limit: config.overlap_detail_limit,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// A service over an in-memory database (for testing).
    pub fn in_memory(registry: Arc<ManagerRegistry>) -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::InternalError(format!("failed to open database: {}", e)))?;
        Ok(PathwayService {
            store,
            registry,
            overlap_detail_limit: DEFAULT_OVERLAP_DETAIL_LIMIT,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// Replaces the random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_overlap_detail_limit(mut self, limit: usize) -> Self {
        self.overlap_detail_limit = limit;
        self
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    /// Stores `graph` through the manager of `resource`. An existing row
    /// with the same identifier is returned unchanged.
    pub fn import_pathway(
        &mut self,
        resource: &str,
        pathway_id: &str,
        graph: &PathwayGraph,
    ) -> Result<Pathway, ApiError> {
        let manager = self.registry.require(resource)?;
        let pathway = NewPathway::from_graph(pathway_id, resource, graph)?;
        Ok(manager.import(&mut self.store, pathway)?)
    }

    // -----------------------------------------------------------------------
    // Merged views
    // -----------------------------------------------------------------------

    fn merged(
        &self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
    ) -> Result<PathwayGraph, ApiError> {
        let merged = merge_pathways(&self.store, selection)?;
        if filter.is_empty() {
            return Ok(merged);
        }
        let filtered = filter_by_annotation(&merged, filter);
        tracing::debug!(
            edges_before = merged.edge_count(),
            edges_after = filtered.edge_count(),
            "applied annotation filter"
        );
        Ok(filtered)
    }

    /// Renders the merged (optionally filtered and collapsed) graph.
    pub fn export_pathways(
        &self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
        collapse: bool,
        format: ExportFormat,
    ) -> Result<Payload, ApiError> {
        let mut graph = self.merged(selection, filter)?;
        if collapse {
            collapse_to_genes(&mut graph);
        }
        Ok(export(&graph, format)?)
    }

    pub fn annotation_tree(
        &self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
    ) -> Result<Vec<TreeNode>, ApiError> {
        let graph = self.merged(selection, filter)?;
        Ok(annotation_tree(&graph))
    }

    /// Shortest or all simple paths between two nodes of the merged graph.
    pub fn find_paths(
        &mut self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
        request: &PathsRequest,
    ) -> Result<PathsResponse, ApiError> {
        let graph = self.merged(selection, filter)?;
        match request.method {
            PathsMethod::Shortest => {
                match shortest_path(&graph, &request.source, &request.target, request.undirected) {
                    Ok(path) => Ok(PathsResponse::found(vec![path])),
                    Err(PathError::NoPath { .. }) if request.random => {
                        let path = fallback_path(&graph, &request.source, &mut self.rng)?;
                        Ok(PathsResponse::found(vec![path]))
                    }
                    Err(PathError::NoPath { .. }) => Ok(PathsResponse::no_path()),
                    Err(e) => Err(e.into()),
                }
            }
            PathsMethod::All => {
                let paths: Vec<Vec<NodeSignature>> = all_paths(
                    &graph,
                    &request.source,
                    &request.target,
                    request.cutoff,
                    request.undirected,
                )?
                .collect();
                tracing::debug!(paths = paths.len(), cutoff = request.cutoff, "enumerated paths");
                if paths.is_empty() {
                    Ok(PathsResponse::no_path())
                } else {
                    Ok(PathsResponse::found(paths))
                }
            }
        }
    }

    pub fn random_path(
        &mut self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
    ) -> Result<PathsResponse, ApiError> {
        let graph = self.merged(selection, filter)?;
        Ok(PathsResponse::found(vec![random_path(&graph, &mut self.rng)]))
    }

    /// The `k` nodes of highest betweenness in the merged graph.
    pub fn central_nodes(
        &self,
        selection: &PathwaySelection,
        filter: &AnnotationFilter,
        k: usize,
    ) -> Result<Vec<NodeSignature>, ApiError> {
        let graph = self.merged(selection, filter)?;
        Ok(top_betweenness(&graph, k))
    }

    // -----------------------------------------------------------------------
    // Overlap
    // -----------------------------------------------------------------------

    /// Venn records for the selection. Without an explicit `detail` the
    /// node lists are included only for small inputs.
    pub fn overlap(
        &self,
        selection: &PathwaySelection,
        detail: Option<bool>,
        max_order: usize,
    ) -> Result<Vec<VennRecord>, ApiError> {
        let sets = node_sets_per_pathway(&self.store, selection)?;
        let total: usize = sets.values().map(|nodes| nodes.len()).sum();
        let include_detail = detail.unwrap_or(total <= self.overlap_detail_limit);
        Ok(venn_overlap_up_to(&sets, max_order, include_detail))
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Up to [`SUGGESTION_LIMIT`] pathways of `resource` whose name contains
    /// `query`. Unknown resources have no suggestions.
    pub fn suggest_pathway_names(
        &self,
        query: &str,
        resource: &str,
    ) -> Result<Vec<Suggestion>, ApiError> {
        if !self.registry.contains(resource) {
            return Ok(Vec::new());
        }
        let pathways =
            self.store
                .query_pathway_by_name_and_resource(query, resource, Some(SUGGESTION_LIMIT))?;
        Ok(pathways
            .into_iter()
            .map(|pathway| Suggestion {
                label: pathway.name,
                value: pathway.pathway_id,
            })
            .collect())
    }

    /// Stored pathway count for every registered resource.
    pub fn resource_counts(&self) -> Result<Vec<ResourceCount>, ApiError> {
        let counts: BTreeMap<String, usize> =
            self.store.count_pathways_by_resource()?.into_iter().collect();
        Ok(self
            .registry
            .resources()
            .map(|resource| ResourceCount {
                resource: resource.to_string(),
                pathways: counts.get(resource).copied().unwrap_or(0),
            })
            .collect())
    }

    pub fn delete_all_pathways(&mut self) -> Result<DeleteResponse, ApiError> {
        let deleted = self.store.delete_all_pathways()?;
        tracing::info!(deleted, "deleted all pathways");
        Ok(DeleteResponse {
            status: 200,
            message: "All Pathways have been deleted".to_string(),
            deleted,
        })
    }

    pub fn count_pathways(&self) -> Result<usize, ApiError> {
        Ok(self.store.count_pathways()?)
    }
}
