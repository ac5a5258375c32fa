// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::Rng;

/// Directed graph on `n` vertices where each ordered pair `(u, v)`, `u != v`,
/// is an edge with probability `p`.
pub fn random_digraph<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Vec<Vec<usize>> {
    (0..n)
        .map(|u| (0..n).filter(|&v| v != u && rng.gen_bool(p)).collect())
        .collect()
}

/// Disjoint union of directed cycles of the given lengths.
pub fn disjoint_cycles(lengths: &[usize]) -> Vec<Vec<usize>> {
    let mut adjacency = Vec::new();
    for &len in lengths {
        let base = adjacency.len();
        for i in 0..len {
            adjacency.push(vec![base + (i + 1) % len]);
        }
    }
    adjacency
}
