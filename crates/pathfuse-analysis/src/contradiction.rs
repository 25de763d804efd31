//! Contradiction detection.
//!
//! For every unordered node pair with at least one edge, the relations of
//! all parallel edges in both directions are pooled. A pair is
//! contradictory when either
//!
//! 1. more than one polarity is asserted (increase family, decrease family,
//!    `causesNoChange`), or
//! 2. a causal relation and a pure `association` are both asserted.
//!
//! Polarity is reported when both conditions hold.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;
use serde::Serialize;

use pathfuse_core::annotation::{CONTRADICTS, INTERESTING_EDGE};
use pathfuse_core::{NodeSignature, PathwayGraph, Relation};

/// Why a pair was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContradictionKind {
    /// Opposing causal directions.
    Polarity,
    /// A causal relation next to a bare association.
    Association,
}

/// A contradictory node pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contradiction {
    pub a: NodeSignature,
    pub b: NodeSignature,
    pub relations: BTreeSet<Relation>,
    pub kind: ContradictionKind,
}

/// Classifies a pooled relation set.
pub fn classify(relations: &BTreeSet<Relation>) -> Option<ContradictionKind> {
    let increase = relations.iter().any(|r| r.is_increase());
    let decrease = relations.iter().any(|r| r.is_decrease());
    let no_change = relations.contains(&Relation::CausesNoChange);
    let polarities = [increase, decrease, no_change]
        .into_iter()
        .filter(|present| *present)
        .count();
    if polarities > 1 {
        return Some(ContradictionKind::Polarity);
    }

    let causal = relations.iter().any(|r| r.is_causal());
    let association = relations.iter().any(|r| r.is_association());
    if causal && association {
        return Some(ContradictionKind::Association);
    }
    None
}

fn pooled_relations(graph: &PathwayGraph) -> BTreeMap<(NodeIndex, NodeIndex), BTreeSet<Relation>> {
    let mut pairs: BTreeMap<(NodeIndex, NodeIndex), BTreeSet<Relation>> = BTreeMap::new();
    for edge in graph.edges() {
        let key = if edge.source <= edge.target {
            (edge.source, edge.target)
        } else {
            (edge.target, edge.source)
        };
        pairs.entry(key).or_default().insert(edge.data.relation);
    }
    pairs
}

/// Lists every contradictory pair.
pub fn find_contradictions(graph: &PathwayGraph) -> Vec<Contradiction> {
    pooled_relations(graph)
        .into_iter()
        .filter_map(|((a, b), relations)| {
            let kind = classify(&relations)?;
            Some(Contradiction {
                a: graph.node_at(a)?.signature(),
                b: graph.node_at(b)?.signature(),
                relations,
                kind,
            })
        })
        .collect()
}

/// Adds `Interesting edge = Contradicts` to every edge of every
/// contradictory pair. Returns the number of pairs labelled.
pub fn label_contradictions(graph: &mut PathwayGraph) -> usize {
    let flagged: Vec<(NodeIndex, NodeIndex)> = pooled_relations(graph)
        .into_iter()
        .filter(|(_, relations)| classify(relations).is_some())
        .map(|(pair, _)| pair)
        .collect();
    for &(a, b) in &flagged {
        graph.label_edges_between(a, b, INTERESTING_EDGE, CONTRADICTS);
    }
    flagged.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::p;
    use pathfuse_core::{EdgeData, Node};

    fn set(relations: &[Relation]) -> BTreeSet<Relation> {
        relations.iter().copied().collect()
    }

    #[test]
    fn classify_predicate() {
        assert_eq!(
            classify(&set(&[Relation::Increases, Relation::Decreases])),
            Some(ContradictionKind::Polarity)
        );
        assert_eq!(
            classify(&set(&[Relation::DirectlyIncreases, Relation::DirectlyDecreases])),
            Some(ContradictionKind::Polarity)
        );
        assert_eq!(
            classify(&set(&[Relation::CausesNoChange, Relation::Increases])),
            Some(ContradictionKind::Polarity)
        );
        assert_eq!(
            classify(&set(&[Relation::Regulates, Relation::Association])),
            Some(ContradictionKind::Association)
        );
        // polarity wins when both hold
        assert_eq!(
            classify(&set(&[Relation::Increases, Relation::Decreases, Relation::Association])),
            Some(ContradictionKind::Polarity)
        );
        assert_eq!(classify(&set(&[Relation::Increases])), None);
        assert_eq!(
            classify(&set(&[Relation::Increases, Relation::DirectlyIncreases])),
            None
        );
        assert_eq!(classify(&set(&[Relation::Association, Relation::Binds])), None);
        assert_eq!(classify(&set(&[Relation::PartOf, Relation::Increases])), None);
    }

    fn node(i: usize) -> Node {
        p(&format!("N{}", i))
    }

    /// Five nodes: (0,1) {decreases, increases}, (1,2) {increases},
    /// (2,3) {increases, association}, (3,4) {causesNoChange, increases}.
    fn worked_example() -> PathwayGraph {
        let mut graph = PathwayGraph::new();
        let edges = [
            (0, 1, Relation::Decreases),
            (0, 1, Relation::Increases),
            (1, 2, Relation::Increases),
            (2, 3, Relation::Increases),
            (2, 3, Relation::Association),
            (3, 4, Relation::CausesNoChange),
            (3, 4, Relation::Increases),
        ];
        for (u, v, relation) in edges {
            graph.add_edge(node(u), node(v), EdgeData::new(relation));
        }
        graph
    }

    #[test]
    fn worked_example_pairs() {
        let graph = worked_example();
        let found = find_contradictions(&graph);
        let pairs: Vec<(NodeSignature, NodeSignature, ContradictionKind)> =
            found.iter().map(|c| (c.a, c.b, c.kind)).collect();

        let sig = |i: usize| node(i).signature();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&(sig(0), sig(1), ContradictionKind::Polarity)));
        assert!(pairs.contains(&(sig(2), sig(3), ContradictionKind::Association)));
        assert!(pairs.contains(&(sig(3), sig(4), ContradictionKind::Polarity)));
        assert!(!found.iter().any(|c| c.a == sig(1) && c.b == sig(2)));
    }

    #[test]
    fn direction_does_not_matter() {
        let mut graph = PathwayGraph::new();
        graph.add_edge(p("A"), p("B"), EdgeData::new(Relation::Increases));
        graph.add_edge(p("B"), p("A"), EdgeData::new(Relation::Decreases));
        assert_eq!(find_contradictions(&graph).len(), 1);
    }

    #[test]
    fn labelling_marks_every_edge_of_flagged_pairs() {
        let mut graph = worked_example();
        let labelled = label_contradictions(&mut graph);
        assert_eq!(labelled, 3);

        let n1 = graph.node_index(&node(1).signature()).unwrap();
        let n2 = graph.node_index(&node(2).signature()).unwrap();
        for edge in graph.edges() {
            let flagged = edge.data.has_annotation(INTERESTING_EDGE, CONTRADICTS);
            let is_clean_pair = (edge.source, edge.target) == (n1, n2);
            assert_eq!(flagged, !is_clean_pair, "{}", edge.statement());
        }
    }

    #[test]
    fn no_edges_no_contradictions() {
        let mut graph = PathwayGraph::new();
        graph.add_node(p("A"));
        assert!(find_contradictions(&graph).is_empty());
        assert_eq!(label_contradictions(&mut graph), 0);
    }
}
