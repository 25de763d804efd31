//! Binary blob codec for stored pathway graphs.
//!
//! Layout:
//!
//! ```text
//! b"PFGB" | u32 LE format version | u64 LE body length | bincode body
//! ```
//!
//! The body is a `GraphDocument`: metadata, the node list in canonical
//! order and the edge list addressed by node position. Encoding is
//! canonical, so two structurally equal graphs produce identical bytes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::edge::EdgeData;
use crate::error::CoreError;
use crate::graph::{GraphMetadata, PathwayGraph};
use crate::node::Node;

pub const MAGIC: [u8; 4] = *b"PFGB";
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 16;

#[derive(Serialize, Deserialize)]
struct GraphDocument {
    metadata: GraphMetadata,
    nodes: Vec<Node>,
    edges: Vec<(u32, u32, EdgeData)>,
}

/// Encodes a graph into a blob.
pub fn dump(graph: &PathwayGraph) -> Result<Vec<u8>, CoreError> {
    let nodes: Vec<Node> = graph.sorted_nodes().into_iter().cloned().collect();
    let position: HashMap<_, u32> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.signature(), i as u32))
        .collect();

    let mut edges = Vec::with_capacity(graph.edge_count());
    for edge in graph.edges() {
        let source = position[&edge.subject.signature()];
        let target = position[&edge.object.signature()];
        edges.push((source, target, edge.data.clone()));
    }
    edges.sort_by_cached_key(|(s, t, data)| (*s, *t, data.canonical_bytes()));

    let document = GraphDocument {
        metadata: graph.metadata.clone(),
        nodes,
        edges,
    };
    let body = bincode::serialize(&document).map_err(|e| CoreError::Serialization {
        reason: e.to_string(),
    })?;

    let mut blob = Vec::with_capacity(HEADER_LEN + body.len());
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    blob.extend_from_slice(&(body.len() as u64).to_le_bytes());
    blob.extend_from_slice(&body);
    Ok(blob)
}

/// Decodes a blob produced by [`dump`].
pub fn load(blob: &[u8]) -> Result<PathwayGraph, CoreError> {
    if blob.len() < HEADER_LEN {
        return Err(CoreError::corrupt(format!(
            "blob is {} bytes, shorter than the {}-byte header",
            blob.len(),
            HEADER_LEN
        )));
    }
    if blob[0..4] != MAGIC {
        return Err(CoreError::corrupt("bad magic number"));
    }
    let version = read_u32(&blob[4..8]);
    if version != FORMAT_VERSION {
        return Err(CoreError::corrupt(format!(
            "unsupported format version {}",
            version
        )));
    }
    let body_len = read_u64(&blob[8..16]);
    let body = &blob[HEADER_LEN..];
    if body.len() as u64 != body_len {
        return Err(CoreError::corrupt(format!(
            "body length mismatch: header says {}, found {}",
            body_len,
            body.len()
        )));
    }

    let document: GraphDocument =
        bincode::deserialize(body).map_err(|e| CoreError::corrupt(e.to_string()))?;

    let mut graph = PathwayGraph::with_metadata(document.metadata);
    let mut seen = HashSet::with_capacity(document.nodes.len());
    let mut indices = Vec::with_capacity(document.nodes.len());
    for node in document.nodes {
        let signature = node.signature();
        if !seen.insert(signature) {
            return Err(CoreError::corrupt(format!(
                "duplicate node {}",
                node.as_bel()
            )));
        }
        indices.push(graph.add_node(node));
    }
    for (source, target, data) in document.edges {
        let (Some(&s), Some(&t)) = (indices.get(source as usize), indices.get(target as usize))
        else {
            return Err(CoreError::corrupt(format!(
                "edge ({}, {}) references a node outside 0..{}",
                source,
                target,
                indices.len()
            )));
        };
        graph.add_edge_between(s, t, data);
    }
    Ok(graph)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
