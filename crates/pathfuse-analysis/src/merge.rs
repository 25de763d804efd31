//! Graph merge engine.
//!
//! [`merge_pathways`] resolves every selected `(pathway_id, resource)` pair
//! before decoding anything, so an unknown pathway aborts the request
//! without partial work. Each decoded graph is tagged with its provenance,
//! the graphs are unioned, and contradiction labels are computed on the
//! result. Stored blobs are only read.

use indexmap::IndexSet;

use pathfuse_core::annotation::annotate_provenance;
use pathfuse_core::graph::GraphMetadata;
use pathfuse_core::PathwayGraph;
use pathfuse_storage::{Pathway, PathwayRepository};

use crate::contradiction::label_contradictions;
use crate::error::AnalysisError;

/// An ordered list of `(pathway_id, resource)` pairs without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathwaySelection {
    entries: IndexSet<(String, String)>,
}

impl PathwaySelection {
    pub fn new() -> Self {
        PathwaySelection::default()
    }

    /// Builds a selection from pairs; repeats keep their first position.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut selection = PathwaySelection::new();
        for (pathway_id, resource) in pairs {
            selection.push(pathway_id, resource);
        }
        selection
    }

    /// Appends a pair, returning `false` if it was already selected.
    pub fn push(&mut self, pathway_id: impl Into<String>, resource: impl Into<String>) -> bool {
        self.entries.insert((pathway_id.into(), resource.into()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(pathway_id, resource)| (pathway_id.as_str(), resource.as_str()))
    }
}

/// Looks up every selected pathway, failing on the first unknown pair.
pub(crate) fn resolve(
    repo: &dyn PathwayRepository,
    selection: &PathwaySelection,
) -> Result<Vec<Pathway>, AnalysisError> {
    if selection.is_empty() {
        return Err(AnalysisError::EmptySelection);
    }
    let mut pathways = Vec::with_capacity(selection.len());
    for (pathway_id, resource) in selection.iter() {
        let pathway = repo.get_pathway_by_id(pathway_id, resource)?.ok_or_else(|| {
            AnalysisError::PathwayNotFound {
                pathway_id: pathway_id.to_string(),
                resource: resource.to_string(),
            }
        })?;
        pathways.push(pathway);
    }
    Ok(pathways)
}

/// Decodes a stored pathway, logging corrupt blobs.
pub(crate) fn load_graph(pathway: &Pathway) -> Result<PathwayGraph, AnalysisError> {
    pathway.load_graph().map_err(|e| {
        tracing::error!(
            pathway_id = %pathway.pathway_id,
            resource = %pathway.resource_name,
            error = %e,
            "stored blob failed to decode"
        );
        AnalysisError::Core(e)
    })
}

/// Union of several graphs: one node per signature, every edge kept except
/// exact duplicates. The result is named after its inputs.
pub fn union(graphs: &[PathwayGraph]) -> PathwayGraph {
    let names: Vec<&str> = graphs
        .iter()
        .map(|g| g.metadata.name.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    let mut merged = PathwayGraph::with_metadata(GraphMetadata::new(names.join(", "), "1.0.0"));
    for graph in graphs {
        merged.extend_from(graph);
    }
    merged
}

/// Resolves, annotates and unions the selected pathways, then labels
/// contradictory edges.
pub fn merge_pathways(
    repo: &dyn PathwayRepository,
    selection: &PathwaySelection,
) -> Result<PathwayGraph, AnalysisError> {
    let pathways = resolve(repo, selection)?;

    let mut graphs = Vec::with_capacity(pathways.len());
    for pathway in &pathways {
        let mut graph = load_graph(pathway)?;
        annotate_provenance(
            &mut graph,
            &pathway.name,
            &pathway.resource_name,
            &pathway.pathway_id,
        );
        if graph.metadata.name.is_empty() {
            graph.metadata.name = pathway.name.clone();
        }
        tracing::debug!(
            pathway_id = %pathway.pathway_id,
            resource = %pathway.resource_name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "adding graph"
        );
        graphs.push(graph);
    }

    let mut merged = union(&graphs);
    let contradictions = label_contradictions(&mut merged);
    tracing::info!(
        pathways = pathways.len(),
        nodes = merged.node_count(),
        edges = merged.edge_count(),
        contradictions,
        "merged pathways"
    );
    Ok(merged)
}
