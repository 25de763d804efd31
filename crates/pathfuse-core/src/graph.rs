//! PathwayGraph: the directed multigraph container shared by every layer.
//!
//! [`PathwayGraph`] wraps a petgraph `StableGraph<Node, EdgeData>` together
//! with a signature index, so that there is exactly one node per
//! [`NodeSignature`]. Adding a node that is already present returns the
//! existing index; adding an edge never merges with existing edges, which is
//! what keeps per-source statements as parallel edges after a merge.
//!
//! The index is insertion-ordered. [`PathwayGraph::nodes`] therefore yields
//! nodes in the order they were first added, which is the iteration order
//! used for stable tie-breaking in the analysis passes.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use serde::{Deserialize, Serialize};

use crate::edge::EdgeData;
use crate::id::{EdgeKey, NodeSignature};
use crate::node::Node;

/// Document-level metadata carried through the blob round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub name: String,
    pub version: String,
    pub authors: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
}

impl GraphMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        GraphMetadata {
            name: name.into(),
            version: version.into(),
            ..GraphMetadata::default()
        }
    }
}

/// A borrowed view of one edge with both endpoint nodes resolved.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: EdgeIndex<u32>,
    pub source: NodeIndex<u32>,
    pub target: NodeIndex<u32>,
    pub subject: &'a Node,
    pub object: &'a Node,
    pub data: &'a EdgeData,
}

impl EdgeView<'_> {
    /// The statement rendering `<subject> <relation> <object>`.
    pub fn statement(&self) -> String {
        format!(
            "{} {} {}",
            self.subject.as_bel(),
            self.data.relation,
            self.object.as_bel()
        )
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::of(&self.subject.signature(), &self.object.signature(), self.data)
    }
}

/// A pathway: nodes unique by signature, parallel edges allowed.
#[derive(Debug, Clone, Default)]
pub struct PathwayGraph {
    graph: StableGraph<Node, EdgeData, Directed, u32>,
    index: IndexMap<NodeSignature, NodeIndex<u32>>,
    pub metadata: GraphMetadata,
}

impl PathwayGraph {
    pub fn new() -> Self {
        PathwayGraph::default()
    }

    pub fn with_metadata(metadata: GraphMetadata) -> Self {
        PathwayGraph {
            metadata,
            ..PathwayGraph::default()
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Returns a read-only reference to the underlying petgraph graph.
    pub fn graph(&self) -> &StableGraph<Node, EdgeData, Directed, u32> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_index(&self, signature: &NodeSignature) -> Option<NodeIndex<u32>> {
        self.index.get(signature).copied()
    }

    pub fn node(&self, signature: &NodeSignature) -> Option<&Node> {
        self.node_index(signature)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    pub fn node_at(&self, idx: NodeIndex<u32>) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    pub fn contains_node(&self, signature: &NodeSignature) -> bool {
        self.index.contains_key(signature)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.index.values().map(move |&idx| &self.graph[idx])
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex<u32>> + '_ {
        self.index.values().copied()
    }

    /// Signatures in insertion order.
    pub fn signatures(&self) -> impl Iterator<Item = NodeSignature> + '_ {
        self.index.keys().copied()
    }

    /// Nodes sorted by canonical string.
    pub fn sorted_nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes().collect();
        nodes.sort_by_cached_key(|node| node.as_bel());
        nodes
    }

    /// All edges in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(move |edge| EdgeView {
            id: edge.id(),
            source: edge.source(),
            target: edge.target(),
            subject: &self.graph[edge.source()],
            object: &self.graph[edge.target()],
            data: edge.weight(),
        })
    }

    /// Every edge between `a` and `b`, in both directions.
    pub fn edges_between(&self, a: NodeIndex<u32>, b: NodeIndex<u32>) -> Vec<EdgeView<'_>> {
        self.edge_ids_between(a, b)
            .into_iter()
            .filter_map(|id| {
                let (source, target) = self.graph.edge_endpoints(id)?;
                Some(EdgeView {
                    id,
                    source,
                    target,
                    subject: &self.graph[source],
                    object: &self.graph[target],
                    data: &self.graph[id],
                })
            })
            .collect()
    }

    /// Identities of all edges, for exact-duplicate suppression.
    pub fn edge_keys(&self) -> HashSet<EdgeKey> {
        self.edges().map(|edge| edge.key()).collect()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Adds `node` unless a node with the same signature exists, returning
    /// the index of the node stored in the graph. An existing node picks up
    /// attributes it lacks from `node`.
    pub fn add_node(&mut self, node: Node) -> NodeIndex<u32> {
        let signature = node.signature();
        if let Some(&idx) = self.index.get(&signature) {
            if let Some(stored) = self.graph.node_weight_mut(idx) {
                stored.absorb(&node);
            }
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(signature, idx);
        idx
    }

    /// Adds an edge `subject -> object`, inserting either node if needed.
    pub fn add_edge(&mut self, subject: Node, object: Node, data: EdgeData) -> EdgeIndex<u32> {
        let source = self.add_node(subject);
        let target = self.add_node(object);
        self.graph.add_edge(source, target, data)
    }

    /// Adds an edge between two existing nodes.
    pub fn add_edge_between(
        &mut self,
        source: NodeIndex<u32>,
        target: NodeIndex<u32>,
        data: EdgeData,
    ) -> EdgeIndex<u32> {
        self.graph.add_edge(source, target, data)
    }

    /// Removes a node and all of its edges.
    pub fn remove_node(&mut self, signature: &NodeSignature) -> Option<Node> {
        let idx = self.index.shift_remove(signature)?;
        self.graph.remove_node(idx)
    }

    /// Applies `f` to the data of every edge.
    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut EdgeData),
    {
        let ids: Vec<EdgeIndex<u32>> = self.graph.edge_indices().collect();
        for id in ids {
            if let Some(data) = self.graph.edge_weight_mut(id) {
                f(data);
            }
        }
    }

    /// Adds `key = value` to every edge between `a` and `b` (both
    /// directions). Other annotation keys are left untouched.
    pub fn label_edges_between(
        &mut self,
        a: NodeIndex<u32>,
        b: NodeIndex<u32>,
        key: &str,
        value: &str,
    ) {
        for id in self.edge_ids_between(a, b) {
            if let Some(data) = self.graph.edge_weight_mut(id) {
                data.annotate(key, value);
            }
        }
    }

    /// Copies every node and edge of `other` into `self`. Nodes are unified
    /// by signature; an edge is skipped only when an identical edge (same
    /// endpoints, same data) is already present.
    pub fn extend_from(&mut self, other: &PathwayGraph) {
        let mut seen = self.edge_keys();
        for node in other.nodes() {
            self.add_node(node.clone());
        }
        for edge in other.edges() {
            if seen.insert(edge.key()) {
                self.add_edge(edge.subject.clone(), edge.object.clone(), edge.data.clone());
            }
        }
    }

    /// Returns `true` if both graphs hold the same metadata, the same node
    /// set and the same multiset of edges (endpoints plus data).
    pub fn structurally_equal(&self, other: &PathwayGraph) -> bool {
        if self.metadata != other.metadata
            || self.node_count() != other.node_count()
            || self.edge_count() != other.edge_count()
        {
            return false;
        }
        let nodes = |g: &PathwayGraph| g.nodes().map(Node::as_bel).collect::<BTreeSet<_>>();
        if nodes(self) != nodes(other) {
            return false;
        }
        let edges = |g: &PathwayGraph| {
            let mut edges: Vec<(String, String, Vec<u8>)> = g
                .edges()
                .map(|e| (e.subject.as_bel(), e.object.as_bel(), e.data.canonical_bytes()))
                .collect();
            edges.sort();
            edges
        };
        edges(self) == edges(other)
    }

    fn edge_ids_between(&self, a: NodeIndex<u32>, b: NodeIndex<u32>) -> Vec<EdgeIndex<u32>> {
        let mut ids: Vec<EdgeIndex<u32>> = self.graph.edges_connecting(a, b).map(|e| e.id()).collect();
        if a != b {
            ids.extend(self.graph.edges_connecting(b, a).map(|e| e.id()));
        }
        ids
    }
}
