//! Shared fixtures for unit tests.

use pathfuse_core::graph::GraphMetadata;
use pathfuse_core::{EdgeData, Node, PathwayGraph, Relation};
use pathfuse_storage::{InMemoryStore, NewPathway, PathwayRepository};

pub fn p(name: &str) -> Node {
    Node::protein("HGNC", name)
}

pub fn g(name: &str) -> Node {
    Node::gene("HGNC", name)
}

/// A pathway graph under construction, with its storage key.
pub struct StoredGraph {
    pub pathway_id: String,
    pub resource: String,
    pub graph: PathwayGraph,
}

impl StoredGraph {
    pub fn new(pathway_id: &str, resource: &str, name: &str) -> Self {
        StoredGraph {
            pathway_id: pathway_id.to_string(),
            resource: resource.to_string(),
            graph: PathwayGraph::with_metadata(GraphMetadata::new(name, "1.0.0")),
        }
    }

    pub fn edge(mut self, subject: Node, object: Node, relation: Relation) -> Self {
        self.graph.add_edge(subject, object, EdgeData::new(relation));
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.graph.add_node(node);
        self
    }
}

pub fn store_with(graphs: Vec<StoredGraph>) -> InMemoryStore {
    let mut store = InMemoryStore::new();
    for stored in graphs {
        let new = NewPathway::from_graph(stored.pathway_id, stored.resource, &stored.graph).unwrap();
        store.create_pathway(new).unwrap();
    }
    store
}
