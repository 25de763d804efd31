//! Node-set overlap between pathways, shaped for Venn diagrams.
//!
//! Every pathway is collapsed to gene level on its own before any set is
//! compared. Collapsing the merged graph instead would change the counts.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use pathfuse_core::Node;
use pathfuse_storage::PathwayRepository;

use crate::collapse::collapse_to_genes;
use crate::error::AnalysisError;
use crate::merge::{load_graph, resolve, PathwaySelection};

/// Canonical node strings per pathway name, in selection order.
pub type NodeSets = IndexMap<String, BTreeSet<String>>;

/// One Venn region: a single pathway or an intersection of several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VennRecord {
    /// Positions of the intersected pathways.
    pub sets: Vec<usize>,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
}

/// Loads each selected pathway, collapses it to genes and keeps the
/// canonical strings of its molecular abundances.
///
/// A repeated pathway name is keyed as `"<name> (<resource>)"`, then as
/// `"<name> (<resource>:<pathway_id>)"`, so every selected pathway keeps
/// its own set.
pub fn node_sets_per_pathway(
    repo: &dyn PathwayRepository,
    selection: &PathwaySelection,
) -> Result<NodeSets, AnalysisError> {
    let pathways = resolve(repo, selection)?;
    let mut sets = NodeSets::with_capacity(pathways.len());
    for pathway in &pathways {
        let mut graph = load_graph(pathway)?;
        collapse_to_genes(&mut graph);
        let nodes: BTreeSet<String> = graph
            .nodes()
            .filter(|node| node.is_molecular_abundance())
            .map(Node::as_bel)
            .collect();

        let key = set_key(&sets, &pathway.name, &pathway.resource_name, &pathway.pathway_id);
        tracing::debug!(pathway = %key, nodes = nodes.len(), "node set");
        sets.insert(key, nodes);
    }
    Ok(sets)
}

fn set_key(sets: &NodeSets, name: &str, resource: &str, pathway_id: &str) -> String {
    let candidates = [
        name.to_string(),
        format!("{name} ({resource})"),
        format!("{name} ({resource}:{pathway_id})"),
    ];
    if let Some(key) = candidates.iter().find(|key| !sets.contains_key(*key)) {
        return key.clone();
    }
    let base = &candidates[2];
    (2..)
        .map(|n| format!("{base} #{n}"))
        .find(|key| !sets.contains_key(key))
        .unwrap_or_else(|| base.clone())
}

/// Singles followed by every pairwise intersection.
pub fn venn_overlap(sets: &NodeSets, include_detail: bool) -> Vec<VennRecord> {
    venn_overlap_up_to(sets, 2, include_detail)
}

/// Singles followed by intersections of 2 up to `max_order` pathways.
///
/// Each order is listed in combinations order. `include_detail` adds the
/// node lists.
pub fn venn_overlap_up_to(
    sets: &NodeSets,
    max_order: usize,
    include_detail: bool,
) -> Vec<VennRecord> {
    let detail = |nodes: &BTreeSet<String>| {
        include_detail.then(|| nodes.iter().cloned().collect::<Vec<_>>())
    };

    let mut records: Vec<VennRecord> = sets
        .iter()
        .enumerate()
        .map(|(i, (name, nodes))| VennRecord {
            sets: vec![i],
            size: nodes.len(),
            label: Some(name.clone()),
            nodes: detail(nodes),
        })
        .collect();

    let members: Vec<&BTreeSet<String>> = sets.values().collect();
    for order in 2..=max_order.min(members.len()) {
        for combination in (0..members.len()).combinations(order) {
            let mut shared = members[combination[0]].clone();
            for &i in &combination[1..] {
                shared.retain(|node| members[i].contains(node));
            }
            records.push(VennRecord {
                sets: combination,
                size: shared.len(),
                label: None,
                nodes: detail(&shared),
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{g, p, store_with, StoredGraph};
    use pathfuse_core::Relation;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn abc() -> NodeSets {
        let mut sets = NodeSets::new();
        sets.insert("A".to_string(), set(&["x", "y", "z"]));
        sets.insert("B".to_string(), set(&["y", "z", "w"]));
        sets.insert("C".to_string(), set(&["z"]));
        sets
    }

    #[test]
    fn pair_of_pathways() {
        let mut sets = abc();
        sets.shift_remove("C");
        let records = venn_overlap(&sets, true);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sets, vec![0]);
        assert_eq!(records[0].size, 3);
        assert_eq!(records[0].label.as_deref(), Some("A"));
        assert_eq!(records[1].size, 3);
        assert_eq!(records[2].sets, vec![0, 1]);
        assert_eq!(records[2].size, 2);
        assert_eq!(records[2].nodes, Some(vec!["y".to_string(), "z".to_string()]));
    }

    #[test]
    fn pairs_follow_combinations_order() {
        let records = venn_overlap(&abc(), false);
        let regions: Vec<Vec<usize>> = records.iter().map(|r| r.sets.clone()).collect();
        assert_eq!(
            regions,
            vec![vec![0], vec![1], vec![2], vec![0, 1], vec![0, 2], vec![1, 2]]
        );
        assert!(records.iter().all(|r| r.nodes.is_none()));
    }

    #[test]
    fn higher_orders() {
        let records = venn_overlap_up_to(&abc(), 3, false);
        let triple = records.last().unwrap();
        assert_eq!(triple.sets, vec![0, 1, 2]);
        assert_eq!(triple.size, 1);
        // asking for more than there are sets stops at the set count
        assert_eq!(venn_overlap_up_to(&abc(), 9, false).len(), records.len());
    }

    #[test]
    fn minimal_mode_omits_nodes_in_json() {
        let records = venn_overlap(&abc(), false);
        let json = serde_json::to_value(&records[3]).unwrap();
        assert_eq!(json, serde_json::json!({"sets": [0, 1], "size": 2}));
    }

    #[test]
    fn node_sets_collapse_each_pathway_first() {
        let store = store_with(vec![
            StoredGraph::new("hsa1", "kegg", "Signaling")
                .edge(p("EGFR"), p("GRB2"), Relation::Increases)
                .node(pathfuse_core::Node::biological_process("GO", "cell growth")),
            StoredGraph::new("R-1", "reactome", "Signaling")
                .edge(g("EGFR"), pathfuse_core::Node::rna("HGNC", "SOS1"), Relation::Increases),
        ]);
        let selection = PathwaySelection::from_pairs([("hsa1", "kegg"), ("R-1", "reactome")]);
        let sets = node_sets_per_pathway(&store, &selection).unwrap();

        let keys: Vec<&str> = sets.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Signaling", "Signaling (reactome)"]);
        assert_eq!(sets["Signaling"], set(&["g(HGNC:EGFR)", "g(HGNC:GRB2)"]));
        assert_eq!(
            sets["Signaling (reactome)"],
            set(&["g(HGNC:EGFR)", "g(HGNC:SOS1)"])
        );

        let records = venn_overlap(&sets, true);
        assert_eq!(records[2].size, 1);
    }

    #[test]
    fn repeated_names_keep_every_pathway() {
        let store = store_with(vec![
            StoredGraph::new("WP1", "wikipathways", "Apoptosis").edge(p("A"), p("B"), Relation::Increases),
            StoredGraph::new("WP2", "wikipathways", "Apoptosis").edge(p("B"), p("C"), Relation::Increases),
            StoredGraph::new("WP3", "wikipathways", "Apoptosis").edge(p("C"), p("D"), Relation::Increases),
        ]);
        let selection = PathwaySelection::from_pairs([
            ("WP1", "wikipathways"),
            ("WP2", "wikipathways"),
            ("WP3", "wikipathways"),
        ]);
        let sets = node_sets_per_pathway(&store, &selection).unwrap();
        let keys: Vec<&str> = sets.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Apoptosis",
                "Apoptosis (wikipathways)",
                "Apoptosis (wikipathways:WP3)",
            ]
        );
        assert_eq!(sets["Apoptosis (wikipathways:WP3)"], set(&["g(HGNC:C)", "g(HGNC:D)"]));

        let singles = venn_overlap(&sets, false)
            .into_iter()
            .filter(|record| record.sets.len() == 1)
            .count();
        assert_eq!(singles, 3);
    }

    #[test]
    fn node_sets_need_known_pathways() {
        let store = store_with(vec![]);
        let selection = PathwaySelection::from_pairs([("nope", "kegg")]);
        assert!(matches!(
            node_sets_per_pathway(&store, &selection),
            Err(AnalysisError::PathwayNotFound { .. })
        ));
    }
}
