//! Betweenness centrality.
//!
//! Exact Brandes over the directed graph with unit edge weights. Parallel
//! edges count once. Scores are normalized by `(n - 1)(n - 2)` for graphs
//! with more than two nodes.

use std::collections::VecDeque;

use pathfuse_core::{NodeSignature, PathwayGraph};

use crate::paths::Adjacency;

/// Betweenness score of every node, in node insertion order.
pub fn betweenness_centrality(graph: &PathwayGraph) -> Vec<(NodeSignature, f64)> {
    let adjacency = Adjacency::build(graph, false);
    let n = adjacency.len();
    let mut scores = vec![0.0f64; n];

    for source in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        sigma[source] = 1.0;
        distance[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let Some(dv) = distance[v] else {
                continue;
            };
            for &w in &adjacency.neighbours[v] {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != source {
                scores[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = ((n - 1) * (n - 2)) as f64;
        for score in &mut scores {
            *score /= scale;
        }
    }

    adjacency.signatures.into_iter().zip(scores).collect()
}

/// The `k` most central nodes, highest score first. Ties keep node
/// insertion order; `k` larger than the node count returns every node.
pub fn top_betweenness(graph: &PathwayGraph, k: usize) -> Vec<NodeSignature> {
    let mut ranked = betweenness_centrality(graph);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(k).map(|(signature, _)| signature).collect()
}
