//! Path queries: shortest, all simple, and random paths.
//!
//! Every query works on a compact adjacency list built from the graph, with
//! parallel edges collapsed to a single neighbour entry. Neighbours are kept
//! in first-edge order, so results are deterministic for a given graph.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;
use petgraph::graph::NodeIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use pathfuse_core::{NodeSignature, PathwayGraph};

/// Path query failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeSignature, to: NodeSignature },

    #[error("node not found: {signature}")]
    NodeNotFound { signature: NodeSignature },
}

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

/// Nodes by position with deduplicated neighbour lists.
pub(crate) struct Adjacency {
    pub(crate) signatures: Vec<NodeSignature>,
    positions: Vec<NodeIndex<u32>>,
    pub(crate) neighbours: Vec<Vec<usize>>,
}

impl Adjacency {
    pub(crate) fn build(graph: &PathwayGraph, undirected: bool) -> Self {
        let positions: Vec<NodeIndex<u32>> = graph.node_indices().collect();
        let signatures: Vec<NodeSignature> = graph.signatures().collect();
        let by_index: HashMap<NodeIndex<u32>, usize> = positions
            .iter()
            .enumerate()
            .map(|(position, &idx)| (idx, position))
            .collect();
        let position_of = |idx: NodeIndex<u32>| by_index.get(&idx).copied();

        let mut sets: Vec<IndexSet<usize>> = vec![IndexSet::new(); positions.len()];
        for edge in graph.edges() {
            let (Some(source), Some(target)) = (position_of(edge.source), position_of(edge.target))
            else {
                continue;
            };
            sets[source].insert(target);
            if undirected {
                sets[target].insert(source);
            }
        }
        Adjacency {
            signatures,
            positions,
            neighbours: sets.into_iter().map(|set| set.into_iter().collect()).collect(),
        }
    }

    fn position(&self, signature: &NodeSignature) -> Result<usize, PathError> {
        self.signatures
            .iter()
            .position(|s| s == signature)
            .ok_or(PathError::NodeNotFound {
                signature: *signature,
            })
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }
}

// ---------------------------------------------------------------------------
// Shortest path
// ---------------------------------------------------------------------------

/// Breadth-first shortest path from `source` to `target`, both included.
///
/// With `undirected` set, edges are followed in both directions.
pub fn shortest_path(
    graph: &PathwayGraph,
    source: &NodeSignature,
    target: &NodeSignature,
    undirected: bool,
) -> Result<Vec<NodeSignature>, PathError> {
    let adjacency = Adjacency::build(graph, undirected);
    let start = adjacency.position(source)?;
    let goal = adjacency.position(target)?;

    let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut visited = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![adjacency.signatures[goal]];
            let mut cursor = goal;
            while let Some(previous) = parent[cursor] {
                path.push(adjacency.signatures[previous]);
                cursor = previous;
            }
            path.reverse();
            return Ok(path);
        }
        for &next in &adjacency.neighbours[current] {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(current);
                queue.push_back(next);
            }
        }
    }

    Err(PathError::NoPath {
        from: *source,
        to: *target,
    })
}

/// `[source, neighbour]` for a random neighbour in either direction, or
/// just `[source]` for an isolated node.
pub fn fallback_path<R: Rng + ?Sized>(
    graph: &PathwayGraph,
    source: &NodeSignature,
    rng: &mut R,
) -> Result<Vec<NodeSignature>, PathError> {
    let adjacency = Adjacency::build(graph, true);
    let start = adjacency.position(source)?;
    let mut path = vec![*source];
    if let Some(&next) = adjacency.neighbours[start].choose(rng) {
        path.push(adjacency.signatures[next]);
    }
    Ok(path)
}

// ---------------------------------------------------------------------------
// All simple paths
// ---------------------------------------------------------------------------

/// Lazy depth-first enumeration of simple paths.
///
/// Produced by [`all_paths`]. Each item holds at most `cutoff + 1` nodes.
pub struct AllSimplePaths {
    adjacency: Adjacency,
    target: usize,
    cutoff: usize,
    path: Vec<usize>,
    on_path: Vec<bool>,
    cursors: Vec<usize>,
}

impl Iterator for AllSimplePaths {
    type Item = Vec<NodeSignature>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &current = self.path.last()?;
            let depth = self.cursors.len() - 1;
            let cursor = self.cursors[depth];
            let neighbours = &self.adjacency.neighbours[current];

            if cursor >= neighbours.len() {
                self.cursors.pop();
                self.path.pop();
                self.on_path[current] = false;
                continue;
            }
            self.cursors[depth] += 1;

            let next = neighbours[cursor];
            if self.on_path[next] {
                continue;
            }
            if next == self.target {
                let mut found: Vec<NodeSignature> = self
                    .path
                    .iter()
                    .map(|&i| self.adjacency.signatures[i])
                    .collect();
                found.push(self.adjacency.signatures[next]);
                return Some(found);
            }
            if self.path.len() < self.cutoff {
                self.path.push(next);
                self.on_path[next] = true;
                self.cursors.push(0);
            }
        }
    }
}

/// All simple paths from `source` to `target` with at most `cutoff` edges.
///
/// `cutoff == 0` and `source == target` both yield no paths.
pub fn all_paths(
    graph: &PathwayGraph,
    source: &NodeSignature,
    target: &NodeSignature,
    cutoff: usize,
    undirected: bool,
) -> Result<AllSimplePaths, PathError> {
    let adjacency = Adjacency::build(graph, undirected);
    let start = adjacency.position(source)?;
    let goal = adjacency.position(target)?;

    let mut on_path = vec![false; adjacency.len()];
    let (path, cursors) = if cutoff == 0 || start == goal {
        (Vec::new(), Vec::new())
    } else {
        on_path[start] = true;
        (vec![start], vec![0])
    };

    Ok(AllSimplePaths {
        adjacency,
        target: goal,
        cutoff,
        path,
        on_path,
        cursors,
    })
}

// ---------------------------------------------------------------------------
// Random path
// ---------------------------------------------------------------------------

/// A random walk from a random start node, following unvisited successors
/// until a dead end. An empty graph gives an empty path.
pub fn random_path<R: Rng + ?Sized>(graph: &PathwayGraph, rng: &mut R) -> Vec<NodeSignature> {
    let adjacency = Adjacency::build(graph, false);
    let starts: Vec<usize> = (0..adjacency.len()).collect();
    let Some(&start) = starts.choose(rng) else {
        return Vec::new();
    };

    let mut visited = vec![false; adjacency.len()];
    let mut path = vec![adjacency.signatures[start]];
    visited[start] = true;
    let mut current = start;
    loop {
        let candidates: Vec<usize> = adjacency.neighbours[current]
            .iter()
            .copied()
            .filter(|&n| !visited[n])
            .collect();
        let Some(&next) = candidates.choose(rng) else {
            break;
        };
        visited[next] = true;
        path.push(adjacency.signatures[next]);
        current = next;
    }
    path
}
