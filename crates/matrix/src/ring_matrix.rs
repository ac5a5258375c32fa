// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Matrices over GR(4^n) and the permanent-minus-determinant.
//!
//! For a matrix `M` over GR(4^n), `per(M) - det(M)` is a multiple of two:
//! every permutation contributes `(1 - sgn) * prod`, which is `0` or `2 * prod`.
//! It is computed with a Gaussian-style pass that keeps the determinant
//! fixed while splitting the permanent by linearity in one row at a time:
//!
//! `per(M) = per(M') + per(M'')`, where row `i2` of `M'` is
//! `row(i2) - t * row(i1)` and row `i2` of `M''` is `t * row(i1)`.
//!
//! Rows `i1` and `i2` of `M''` are proportional, so `per(M'')` is twice the
//! sum over permutations with `sigma(i1) < sigma(i2)`. Only that sum mod 2 is
//! needed, and over the field it is the low half of the determinant
//! polynomial of `project(M'')` in the rows `i1, i2`.

use evencycle_algebra::{AlgebraResult, Galois, RingElement};
use rand::Rng;
use tracing::trace;

use crate::field_matrix::{Elimination, FieldMatrix};
use crate::matrix::Matrix;

pub type RingMatrix = Matrix<RingElement>;

impl Matrix<RingElement> {
    /// Entry-wise reduction mod 2.
    pub fn project(&self) -> FieldMatrix {
        self.map(RingElement::project)
    }

    /// `per(self) - det(self)`, which is always even. Destroys `self`.
    ///
    /// # Errors
    ///
    /// Propagates [`evencycle_algebra::AlgebraError::FieldTooSmall`] from the
    /// determinant polynomials when the field has fewer than `2n - 1` elements.
    pub fn per_minus_det<R: Rng + ?Sized>(
        &mut self,
        galois: &Galois,
        rng: &mut R,
        elimination: Elimination,
    ) -> AlgebraResult<RingElement> {
        let ring = galois.ring();
        let n = self.n();
        let mut acc = ring.zero();
        let mut marked = vec![false; n];
        let mut assignment: Vec<Option<usize>> = vec![None; n];
        let mut deferred = Vec::new();

        for col in 0..n {
            match (0..n).find(|&r| !marked[r] && self[(r, col)].is_odd()) {
                Some(pivot) => {
                    let split = self.clear_odd_entries(galois, pivot, col, rng, elimination)?;
                    acc = ring.add(acc, split);
                    marked[pivot] = true;
                    assignment[col] = Some(pivot);
                }
                None => deferred.push(col),
            }
        }
        trace!(n, deferred = deferred.len(), "odd-entry elimination finished");

        // Every remaining term with an even factor contributes nothing, so
        // only a full assignment of odd pivots can survive.
        if let [col] = deferred[..] {
            assignment[col] = marked.iter().position(|&m| !m);
        }
        let det_term = match assignment.iter().copied().collect::<Option<Vec<usize>>>() {
            Some(rows) => {
                let product = rows
                    .iter()
                    .enumerate()
                    .fold(ring.one(), |p, (col, &row)| ring.mul(p, self[(row, col)]));
                acc = ring.add(acc, product);
                if is_odd_permutation(&rows) {
                    ring.neg(product)
                } else {
                    product
                }
            }
            None => ring.zero(),
        };
        Ok(ring.sub(acc, det_term))
    }

    /// Clears every odd entry of column `col` except the one in row `pivot`,
    /// returning the permanent contribution split off along the way.
    fn clear_odd_entries<R: Rng + ?Sized>(
        &mut self,
        galois: &Galois,
        pivot: usize,
        col: usize,
        rng: &mut R,
        elimination: Elimination,
    ) -> AlgebraResult<RingElement> {
        let (ring, field) = (galois.ring(), galois.field());
        let n = self.n();
        let sigma = self[(pivot, col)];
        let mut acc = ring.zero();
        for row in 0..n {
            if row == pivot || self[(row, col)].is_even() {
                continue;
            }
            let t = galois.tau(sigma, self[(row, col)])?;
            let mut split = self.project();
            for c in 0..n {
                split[(row, c)] = ring.mul(t, self[(pivot, c)]).project();
            }
            self.row_op(ring, pivot, row, t, 0);

            let poly = split.polynomial_determinant(field, pivot, row, rng, elimination)?;
            let ordered = poly.low_coefficient_sum(field, n - 1);
            acc = ring.add(acc, ring.double(ordered.lift()));
        }
        Ok(acc)
    }
}

/// Parity of a permutation from its cycle decomposition.
pub fn is_odd_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    let mut cycles = 0;
    for start in 0..perm.len() {
        if seen[start] {
            continue;
        }
        cycles += 1;
        let mut at = start;
        while !seen[at] {
            seen[at] = true;
            at = perm[at];
        }
    }
    (perm.len() - cycles) % 2 == 1
}
