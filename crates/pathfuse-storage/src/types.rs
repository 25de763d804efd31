//! Storage-layer types for stored pathways.
//!
//! A [`Pathway`] is one stored row: descriptive metadata plus the encoded
//! graph blob. Rows are unique on `(pathway_id, resource_name)` and are
//! read-only input to the analysis layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pathfuse_core::codec;
use pathfuse_core::{CoreError, PathwayGraph};

/// A stored pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    /// Row identifier assigned by the backend.
    pub id: i64,
    /// Identifier within the source database (e.g. `hsa04012`).
    pub pathway_id: String,
    /// Source database (e.g. `kegg`).
    pub resource_name: String,
    pub name: String,
    pub version: String,
    pub authors: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    /// Codec format version the blob was written with.
    pub blob_version: u32,
    pub created: DateTime<Utc>,
    pub number_of_nodes: usize,
    pub number_of_edges: usize,
    #[serde(skip)]
    pub blob: Vec<u8>,
}

impl Pathway {
    /// Decodes the stored graph.
    pub fn load_graph(&self) -> Result<PathwayGraph, CoreError> {
        codec::load(&self.blob)
    }
}

/// A pathway about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPathway {
    pub pathway_id: String,
    pub resource_name: String,
    pub name: String,
    pub version: String,
    pub authors: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub number_of_nodes: usize,
    pub number_of_edges: usize,
    pub blob: Vec<u8>,
}

impl NewPathway {
    /// Derives the row from a graph: metadata and counts come from the
    /// graph, the blob is its encoding. An empty graph name falls back to
    /// the pathway identifier.
    pub fn from_graph(
        pathway_id: impl Into<String>,
        resource_name: impl Into<String>,
        graph: &PathwayGraph,
    ) -> Result<Self, CoreError> {
        let pathway_id = pathway_id.into();
        let metadata = &graph.metadata;
        let name = if metadata.name.is_empty() {
            pathway_id.clone()
        } else {
            metadata.name.clone()
        };
        Ok(NewPathway {
            pathway_id,
            resource_name: resource_name.into(),
            name,
            version: metadata.version.clone(),
            authors: metadata.authors.clone(),
            contact: metadata.contact.clone(),
            description: metadata.description.clone(),
            number_of_nodes: graph.node_count(),
            number_of_edges: graph.edge_count(),
            blob: codec::dump(graph)?,
        })
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Materializes the row with a backend-assigned id and timestamp.
    pub(crate) fn into_pathway(self, id: i64, created: DateTime<Utc>) -> Pathway {
        Pathway {
            id,
            pathway_id: self.pathway_id,
            resource_name: self.resource_name,
            name: self.name,
            version: self.version,
            authors: self.authors,
            contact: self.contact,
            description: self.description,
            blob_version: codec::FORMAT_VERSION,
            created,
            number_of_nodes: self.number_of_nodes,
            number_of_edges: self.number_of_edges,
            blob: self.blob,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_graph_uses_metadata_and_counts() {
        let new = fixtures::new_pathway("hsa04012", "kegg", "ErbB signaling pathway");
        assert_eq!(new.name, "ErbB signaling pathway");
        assert_eq!(new.version, "1.0.0");
        assert_eq!(new.number_of_nodes, 2);
        assert_eq!(new.number_of_edges, 1);

        let row = new.into_pathway(7, Utc::now());
        assert_eq!(row.blob_version, codec::FORMAT_VERSION);
        let graph = row.load_graph().unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn empty_name_falls_back_to_identifier() {
        let graph = PathwayGraph::new();
        let new = NewPathway::from_graph("WP534", "wikipathways", &graph).unwrap();
        assert_eq!(new.name, "WP534");
        assert_eq!(new.with_name("Glycolysis").name, "Glycolysis");
    }
}
