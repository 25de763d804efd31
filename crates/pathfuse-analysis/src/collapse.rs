//! Gene-level collapsing.

use std::collections::HashSet;

use pathfuse_core::{EdgeKey, Node, PathwayGraph};

/// Replaces every gene product (and every gene variant) by its plain gene
/// node, rewiring edges onto the gene.
///
/// An edge whose endpoints only become equal through the collapse is
/// dropped; self-loops that were already present are kept. Exact duplicate
/// edges produced by the rewiring are merged. Nodes that do not collapse
/// keep their position in insertion order.
pub fn collapse_to_genes(graph: &mut PathwayGraph) {
    let target = |node: &Node| node.gene_parent().unwrap_or_else(|| node.clone());
    if graph.nodes().all(|node| node.gene_parent().is_none()) {
        return;
    }

    let mut collapsed = PathwayGraph::with_metadata(graph.metadata.clone());
    for node in graph.nodes() {
        collapsed.add_node(target(node));
    }

    let mut seen = HashSet::new();
    let mut dropped = 0usize;
    for edge in graph.edges() {
        let subject = target(edge.subject);
        let object = target(edge.object);
        if edge.source != edge.target && subject == object {
            dropped += 1;
            continue;
        }
        if !seen.insert(EdgeKey::of(&subject.signature(), &object.signature(), edge.data)) {
            dropped += 1;
            continue;
        }
        collapsed.add_edge(subject, object, edge.data.clone());
    }

    tracing::debug!(
        before = graph.node_count(),
        after = collapsed.node_count(),
        dropped_edges = dropped,
        "collapsed to genes"
    );
    *graph = collapsed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{g, p};
    use pathfuse_core::node::Variant;
    use pathfuse_core::{EdgeData, Relation};

    #[test]
    fn protein_and_rna_become_one_gene() {
        let mut graph = PathwayGraph::new();
        let rna = Node::rna("HGNC", "A");
        graph.add_edge(rna.clone(), p("A"), EdgeData::new(Relation::TranslatedTo));
        graph.add_edge(p("A"), p("B"), EdgeData::new(Relation::Increases));
        graph.add_edge(rna, p("C"), EdgeData::new(Relation::Decreases));

        collapse_to_genes(&mut graph);

        let names: Vec<String> = graph.nodes().map(Node::as_bel).collect();
        assert_eq!(names, vec!["g(HGNC:A)", "g(HGNC:B)", "g(HGNC:C)"]);
        // translatedTo became a self-loop through the collapse and is gone
        assert_eq!(graph.edge_count(), 2);
        let statements: Vec<String> = graph.edges().map(|e| e.statement()).collect();
        assert!(statements.contains(&"g(HGNC:A) increases g(HGNC:B)".to_string()));
        assert!(statements.contains(&"g(HGNC:A) decreases g(HGNC:C)".to_string()));
    }

    #[test]
    fn existing_self_loops_survive() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(p("A"), p("A"), EdgeData::new(Relation::Increases));
        collapse_to_genes(&mut graph);
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.subject, &g("A"));
        assert_eq!(edge.source, edge.target);
    }

    #[test]
    fn rewired_duplicates_are_merged() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(p("A"), p("B"), EdgeData::new(Relation::Increases));
        graph.add_edge(Node::rna("HGNC", "A"), p("B"), EdgeData::new(Relation::Increases));
        graph.add_edge(
            Node::rna("HGNC", "A"),
            p("B"),
            EdgeData::new(Relation::Increases).with_annotation("Database", "kegg"),
        );
        collapse_to_genes(&mut graph);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn variants_collapse_but_complexes_stay() {
        let mut graph = PathwayGraph::new();
        let phospho = p("AKT1").with_variant(Variant::ProteinModification {
            name: "Ph".to_string(),
            code: Some("Ser".to_string()),
            position: Some(473),
        });
        let complex = Node::complex(vec![p("A"), p("B")]);
        let calcium = Node::abundance("CHEBI", "calcium(2+)");
        graph.add_edge(phospho, complex.clone(), EdgeData::new(Relation::Increases));
        graph.add_edge(calcium.clone(), g("AKT1"), EdgeData::new(Relation::Increases));

        collapse_to_genes(&mut graph);

        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_node(&g("AKT1").signature()));
        assert!(graph.contains_node(&complex.signature()));
        assert!(graph.contains_node(&calcium.signature()));
    }

    #[test]
    fn graph_without_gene_products_is_untouched() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(g("A"), g("B"), EdgeData::new(Relation::Increases));
        let before = graph.clone();
        collapse_to_genes(&mut graph);
        assert!(graph.structurally_equal(&before));
    }
}
