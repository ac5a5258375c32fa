// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Directed graphs as adjacency lists and their sampled weight matrices.
//!
//! The text format has one line per vertex: line `i` lists the
//! out-neighbours of vertex `i`, separated by whitespace. An empty line is a
//! vertex without out-edges. Lines starting with `#` are ignored.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use evencycle_algebra::Field;
use evencycle_matrix::FieldMatrix;
use rand::Rng;
use tracing::debug;

use crate::errors::{GraphError, GraphResult};

/// Out-neighbour lists, indexed by vertex.
pub type Adjacency = Vec<Vec<usize>>;

/// A directed graph together with a random field weighting.
///
/// Every edge and every vertex carries an independent nonzero weight; the
/// vertex weight sits on the diagonal and acts as a self-loop.
#[derive(Clone, Debug)]
pub struct Graph {
    adjacency: Adjacency,
    weights: FieldMatrix,
}

impl Graph {
    /// Validates `adjacency` and samples its weight matrix.
    pub fn sample<R: Rng + ?Sized>(
        adjacency: Adjacency,
        field: &Field,
        rng: &mut R,
    ) -> GraphResult<Self> {
        validate(&adjacency)?;
        let n = adjacency.len();
        let mut weights = FieldMatrix::filled(n, field.zero());
        for (from, targets) in adjacency.iter().enumerate() {
            weights[(from, from)] = field.random_nonzero(rng);
            for &to in targets {
                weights[(from, to)] = field.random_nonzero(rng);
            }
        }
        debug!(
            vertices = n,
            edges = edge_count(&adjacency),
            "sampled weighted adjacency"
        );
        Ok(Self { adjacency, weights })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub fn weighted_adjacency(&self) -> &FieldMatrix {
        &self.weights
    }
}

fn validate(adjacency: &[Vec<usize>]) -> GraphResult<()> {
    let vertices = adjacency.len();
    for (from, targets) in adjacency.iter().enumerate() {
        if let Some(&to) = targets.iter().find(|&&to| to >= vertices) {
            return Err(GraphError::VertexOutOfRange { from, to, vertices });
        }
    }
    Ok(())
}

pub fn edge_count(adjacency: &[Vec<usize>]) -> usize {
    adjacency.iter().map(Vec::len).sum()
}

/// Parses the adjacency text format.
pub fn parse_adjacency(input: &str) -> GraphResult<Adjacency> {
    let mut adjacency = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let targets = line
            .split_whitespace()
            .map(|token| {
                token.parse::<usize>().map_err(|err| GraphError::Parse {
                    line: index + 1,
                    message: format!("invalid vertex '{token}': {err}"),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        adjacency.push(targets);
    }
    validate(&adjacency)?;
    Ok(adjacency)
}

pub fn read_adjacency_file(path: impl AsRef<Path>) -> GraphResult<Adjacency> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let adjacency = parse_adjacency(&contents)?;
    debug!(path = %path.display(), vertices = adjacency.len(), "read graph");
    Ok(adjacency)
}

/// Renders `adjacency` in the text format, one newline-terminated line per vertex.
pub fn format_adjacency(adjacency: &[Vec<usize>]) -> String {
    let mut out = String::new();
    for targets in adjacency {
        let line: Vec<String> = targets.iter().map(usize::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Orients an undirected graph.
///
/// Every pair of distinct vertices joined in either direction keeps exactly
/// one edge, pointing either way with equal probability. Self-loops are
/// dropped since every vertex already carries one.
pub fn direct_undirected<R: Rng + ?Sized>(adjacency: &[Vec<usize>], rng: &mut R) -> Adjacency {
    let pairs: BTreeSet<(usize, usize)> = adjacency
        .iter()
        .enumerate()
        .flat_map(|(u, targets)| targets.iter().map(move |&v| (u.min(v), u.max(v))))
        .filter(|(u, v)| u != v)
        .collect();
    let mut directed = vec![Vec::new(); adjacency.len()];
    for (u, v) in pairs {
        if rng.gen_bool(0.5) {
            directed[u].push(v);
        } else {
            directed[v].push(u);
        }
    }
    directed
}
