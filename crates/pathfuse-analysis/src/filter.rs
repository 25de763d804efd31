//! Annotation filtering and the annotation tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use pathfuse_core::PathwayGraph;

/// Requested annotation values per key.
///
/// An edge matches when, for every key, it carries at least one of the
/// requested values.
pub type AnnotationFilter = BTreeMap<String, BTreeSet<String>>;

/// Returns the edge-induced subgraph of edges matching `filter`.
///
/// Nodes without a matching edge are dropped. An empty filter returns a copy
/// of the whole graph, isolated nodes included.
pub fn filter_by_annotation(graph: &PathwayGraph, filter: &AnnotationFilter) -> PathwayGraph {
    if filter.is_empty() {
        return graph.clone();
    }
    let mut filtered = PathwayGraph::with_metadata(graph.metadata.clone());
    for edge in graph.edges() {
        let Some(annotations) = edge.data.annotations.as_ref() else {
            continue;
        };
        let matches = filter.iter().all(|(key, wanted)| {
            annotations
                .get(key)
                .is_some_and(|values| !values.is_disjoint(wanted))
        });
        if matches {
            filtered.add_edge(edge.subject.clone(), edge.object.clone(), edge.data.clone());
        }
    }
    filtered
}

/// One entry of the annotation tree: a key with its values as children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(text: &str) -> Self {
        TreeNode {
            text: text.to_string(),
            children: Vec::new(),
        }
    }
}

/// Every annotation key in the graph with the values used under it,
/// sorted by key then value.
pub fn annotation_tree(graph: &PathwayGraph) -> Vec<TreeNode> {
    let mut keys: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for edge in graph.edges() {
        for (key, values) in edge.data.annotations.iter().flatten() {
            keys.entry(key.as_str())
                .or_default()
                .extend(values.iter().map(String::as_str));
        }
    }
    keys.into_iter()
        .map(|(key, values)| TreeNode {
            text: key.to_string(),
            children: values.into_iter().map(TreeNode::leaf).collect(),
        })
        .collect()
}
