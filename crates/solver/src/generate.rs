// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Benchmark graph families.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::errors::{GraphError, GraphResult};
use crate::graph::Adjacency;

const MAX_ATTEMPTS: usize = 10_000;

/// Directed cycle `0 -> 1 -> ... -> n-1 -> 0`.
pub fn cycle(n: usize) -> Adjacency {
    (0..n).map(|i| vec![(i + 1) % n]).collect()
}

/// Every ordered pair of distinct vertices.
pub fn complete(n: usize) -> Adjacency {
    (0..n)
        .map(|i| (0..n).filter(|&j| j != i).collect())
        .collect()
}

/// `edges` directed edges drawn uniformly without replacement from all
/// ordered pairs of distinct vertices.
pub fn erdos_renyi<R: Rng + ?Sized>(
    vertices: usize,
    edges: usize,
    rng: &mut R,
) -> GraphResult<Adjacency> {
    let mut pairs: Vec<(usize, usize)> = (0..vertices)
        .flat_map(|u| (0..vertices).filter(move |&v| v != u).map(move |v| (u, v)))
        .collect();
    if edges > pairs.len() {
        return Err(GraphError::TooManyEdges {
            requested: edges,
            available: pairs.len(),
        });
    }
    pairs.shuffle(rng);
    let mut adjacency = vec![Vec::new(); vertices];
    for &(u, v) in &pairs[..edges] {
        adjacency[u].push(v);
    }
    Ok(adjacency)
}

/// Random graph with every in- and out-degree equal to `degree`.
///
/// Out-stubs are matched to in-stubs uniformly and the draw is repeated
/// until it has no self-loops and, unless `allow_parallel`, no repeated
/// edges.
pub fn configuration_model<R: Rng + ?Sized>(
    n: usize,
    degree: usize,
    allow_parallel: bool,
    rng: &mut R,
) -> GraphResult<Adjacency> {
    let stubs: Vec<usize> = (0..n).flat_map(|v| std::iter::repeat(v).take(degree)).collect();
    for attempt in 1..=MAX_ATTEMPTS {
        let mut heads = stubs.clone();
        heads.shuffle(rng);
        let mut adjacency = vec![Vec::new(); n];
        for (&tail, head) in stubs.iter().zip(heads) {
            adjacency[tail].push(head);
        }
        if acceptable(&adjacency, allow_parallel) {
            trace!(attempt, "configuration model accepted");
            return Ok(adjacency);
        }
    }
    Err(GraphError::GenerationFailed {
        attempts: MAX_ATTEMPTS,
    })
}

fn acceptable(adjacency: &[Vec<usize>], allow_parallel: bool) -> bool {
    adjacency.iter().enumerate().all(|(v, targets)| {
        !targets.contains(&v)
            && (allow_parallel || {
                let mut sorted = targets.clone();
                sorted.sort_unstable();
                sorted.windows(2).all(|w| w[0] != w[1])
            })
    })
}
