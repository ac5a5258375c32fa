// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Shortest even cycle.
//!
//! With `A_e` the weight matrix whose diagonal is scaled by `e`, the
//! projection of `(per - det)(A_e) / 2` sums the weights of the cycle
//! covers holding an odd number of even cycles. As a polynomial in `e` its
//! coefficient of `e^(k-L)` collects covers that leave `L` vertices off
//! their self-loops. For `L` below the shortest even cycle length no such
//! cover exists, and at that length the coefficient is a nonzero polynomial
//! in the weights, so it vanishes only with probability about `k / 2^n`.

use evencycle_algebra::{interpolate, AlgebraResult, FieldElement, Galois};
use evencycle_matrix::Elimination;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info, instrument, trace};

use crate::errors::SolverResult;
use crate::graph::Graph;

/// Algebraic shortest-even-cycle solver over a fixed Galois context.
///
/// A reported length is always the length of a real even cycle. A `None`
/// may be a false negative with probability bounded by the vertex count
/// over the field order.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'a> {
    galois: &'a Galois,
    elimination: Elimination,
}

impl<'a> Solver<'a> {
    pub fn new(galois: &'a Galois) -> Self {
        Self::with_elimination(galois, Elimination::default())
    }

    pub fn with_elimination(galois: &'a Galois, elimination: Elimination) -> Self {
        Self {
            galois,
            elimination,
        }
    }

    pub fn galois(&self) -> &Galois {
        self.galois
    }

    /// Length of the shortest directed even cycle, or `None`.
    ///
    /// # Errors
    ///
    /// [`evencycle_algebra::AlgebraError::FieldTooSmall`] when the field has
    /// fewer than `2k - 1` elements for `k` vertices. This is checked before
    /// any sampling.
    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    pub fn shortest_even_cycle<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        rng: &mut R,
    ) -> SolverResult<Option<u32>> {
        let k = graph.vertex_count();
        if k < 2 {
            return Ok(None);
        }
        let field = self.galois.field();
        field.ensure_order(2 * k as u64 - 1)?;

        let points = field.distinct_elements(k + 1, rng)?;
        let seeds: Vec<u64> = points.iter().map(|_| rng.gen()).collect();
        let weights = graph.weighted_adjacency();
        let values = points
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&e, &seed)| -> AlgebraResult<FieldElement> {
                let mut stream = ChaCha20Rng::seed_from_u64(seed);
                let value = weights.pcc(self.galois, e, &mut stream, self.elimination)?;
                trace!(point = e.value(), value = value.value(), "evaluated cycle-cover sum");
                Ok(value)
            })
            .collect::<AlgebraResult<Vec<_>>>()?;

        let generating = interpolate(field, &points, &values)?;
        debug!(%generating, "interpolated cycle-cover polynomial");
        let length = (2..=k)
            .step_by(2)
            .find(|&l| !generating.coefficient(k - l).is_zero())
            .map(|l| l as u32);
        info!(?length, "shortest even cycle");
        Ok(length)
    }

    /// Exhaustive search, exponential in the graph size.
    pub fn shortest_even_cycle_brute(&self, graph: &Graph) -> Option<u32> {
        shortest_even_cycle_brute(graph.adjacency())
    }
}

/// Shortest even cycle by enumerating simple cycles.
///
/// Each cycle is found from its smallest vertex only, and paths that can no
/// longer beat the best length are cut.
pub fn shortest_even_cycle_brute(adjacency: &[Vec<usize>]) -> Option<u32> {
    let mut best = None;
    let mut on_path = vec![false; adjacency.len()];
    for start in 0..adjacency.len() {
        on_path[start] = true;
        extend_path(adjacency, start, start, 1, &mut on_path, &mut best);
        on_path[start] = false;
    }
    best.map(|l| l as u32)
}

/// `length` is the cycle length reached by closing the path at `at`.
fn extend_path(
    adjacency: &[Vec<usize>],
    start: usize,
    at: usize,
    length: usize,
    on_path: &mut [bool],
    best: &mut Option<usize>,
) {
    if best.is_some_and(|b| length >= b) {
        return;
    }
    for &next in &adjacency[at] {
        if next == start {
            if length % 2 == 0 {
                *best = Some(length);
            }
        } else if next > start && !on_path[next] {
            on_path[next] = true;
            extend_path(adjacency, start, next, length + 1, on_path, best);
            on_path[next] = false;
        }
    }
}
