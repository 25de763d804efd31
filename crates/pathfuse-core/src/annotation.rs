//! Provenance and label annotation of edges.
//!
//! Annotation is set-union: values are only ever added, so applying the
//! same annotation twice leaves the graph unchanged.

use crate::graph::PathwayGraph;

/// Source database of a statement.
pub const DATABASE: &str = "Database";
/// Pathway identifier within its source database.
pub const PATHWAY_ID: &str = "PathwayID";
/// Human-readable pathway name.
pub const PATHWAY_NAME: &str = "Pathway name";
/// Label key for edges flagged by analysis passes.
pub const INTERESTING_EDGE: &str = "Interesting edge";
/// Label value for contradictory edges.
pub const CONTRADICTS: &str = "Contradicts";

/// Provenance keys added at merge time.
pub const PROVENANCE_KEYS: [&str; 3] = [DATABASE, PATHWAY_ID, PATHWAY_NAME];

/// Tags every edge with the pathway it came from.
pub fn annotate_provenance(
    graph: &mut PathwayGraph,
    pathway_name: &str,
    resource_name: &str,
    pathway_id: &str,
) {
    graph.for_each_edge_mut(|data| {
        data.annotate(DATABASE, resource_name);
        data.annotate(PATHWAY_ID, pathway_id);
        data.annotate(PATHWAY_NAME, pathway_name);
    });
}

/// Gives every edge an (empty) annotation container.
pub fn ensure_annotation_containers(graph: &mut PathwayGraph) {
    graph.for_each_edge_mut(|data| {
        data.annotations.get_or_insert_with(Default::default);
    });
}

/// Adds `key = value` to every edge of the graph.
pub fn add_annotation_value(graph: &mut PathwayGraph, key: &str, value: &str) {
    graph.for_each_edge_mut(|data| data.annotate(key, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{EdgeData, Relation};
    use crate::node::Node;

    fn sample() -> PathwayGraph {
        let mut graph = PathwayGraph::new();
        graph.add_edge(
            Node::protein("HGNC", "EGFR"),
            Node::protein("HGNC", "GRB2"),
            EdgeData::new(Relation::DirectlyIncreases),
        );
        graph.add_edge(
            Node::protein("HGNC", "GRB2"),
            Node::protein("HGNC", "SOS1"),
            EdgeData::new(Relation::Binds).with_annotation("Species", "9606"),
        );
        graph
    }

    #[test]
    fn provenance_is_added_to_every_edge() {
        let mut graph = sample();
        annotate_provenance(&mut graph, "ErbB signaling pathway", "kegg", "hsa04012");
        for edge in graph.edges() {
            assert!(edge.data.has_annotation(DATABASE, "kegg"));
            assert!(edge.data.has_annotation(PATHWAY_ID, "hsa04012"));
            assert!(edge.data.has_annotation(PATHWAY_NAME, "ErbB signaling pathway"));
        }
        // pre-existing keys survive
        assert!(graph.edges().any(|e| e.data.has_annotation("Species", "9606")));
    }

    #[test]
    fn provenance_is_idempotent() {
        let mut once = sample();
        annotate_provenance(&mut once, "ErbB", "kegg", "hsa04012");
        let mut twice = sample();
        annotate_provenance(&mut twice, "ErbB", "kegg", "hsa04012");
        annotate_provenance(&mut twice, "ErbB", "kegg", "hsa04012");
        assert!(once.structurally_equal(&twice));
    }

    #[test]
    fn containers_and_values() {
        let mut graph = sample();
        ensure_annotation_containers(&mut graph);
        assert!(graph.edges().all(|e| e.data.annotations.is_some()));

        add_annotation_value(&mut graph, INTERESTING_EDGE, CONTRADICTS);
        assert!(graph
            .edges()
            .all(|e| e.data.has_annotation(INTERESTING_EDGE, CONTRADICTS)));
    }
}
