// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use evencycle_algebra::{Field, FieldElement, Ring};
use evencycle_matrix::{FieldMatrix, Matrix, RingMatrix};
use rand::Rng;

/// Random matrix with row `copy` overwritten by row `source`.
pub fn singular_field_matrix<R: Rng + ?Sized>(
    field: &Field,
    n: usize,
    source: usize,
    copy: usize,
    rng: &mut R,
) -> FieldMatrix {
    let mut m = FieldMatrix::random(field, n, rng);
    for col in 0..n {
        let v = m[(source, col)];
        m[(copy, col)] = v;
    }
    m
}

/// `V[i][j] = points[i]^j`
pub fn vandermonde(field: &Field, points: &[FieldElement]) -> FieldMatrix {
    Matrix::from_fn(points.len(), |row, col| field.pow(points[row], col as u64))
}

/// `prod_{i < j} (points[i] + points[j])`, the Vandermonde determinant in
/// characteristic two.
pub fn vandermonde_determinant(field: &Field, points: &[FieldElement]) -> FieldElement {
    let mut acc = field.one();
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            acc = field.mul(acc, field.add(a, b));
        }
    }
    acc
}

pub fn random_ring_matrix<R: Rng + ?Sized>(ring: &Ring, n: usize, rng: &mut R) -> RingMatrix {
    Matrix::from_fn(n, |_, _| ring.random(rng))
}

/// Random ring matrix with row `copy` overwritten by row `source`.
pub fn singular_ring_matrix<R: Rng + ?Sized>(
    ring: &Ring,
    n: usize,
    source: usize,
    copy: usize,
    rng: &mut R,
) -> RingMatrix {
    let mut m = random_ring_matrix(ring, n, rng);
    for col in 0..n {
        let v = m[(source, col)];
        m[(copy, col)] = v;
    }
    m
}

/// Random ring matrix where roughly one entry in `sparsity` is even.
pub fn mixed_parity_ring_matrix<R: Rng + ?Sized>(
    ring: &Ring,
    n: usize,
    sparsity: u32,
    rng: &mut R,
) -> RingMatrix {
    Matrix::from_fn(n, |_, _| {
        if rng.gen_ratio(1, sparsity.max(1)) {
            ring.double(ring.random(rng))
        } else {
            ring.random(rng)
        }
    })
}
