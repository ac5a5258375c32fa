// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Matrices over GF(2^n).
//!
//! Besides the plain determinant this module builds the determinant of a
//! matrix as a polynomial in an indeterminate `gamma` that scales two chosen
//! rows ([`FieldMatrix::polynomial_determinant`]), and the
//! permanent-minus-determinant evaluation of a matrix whose diagonal is
//! scaled by a field element ([`FieldMatrix::pcc`]).

use evencycle_algebra::{
    interpolate, AlgebraError, AlgebraResult, Field, FieldElement, Galois, Polynomial,
};
use rand::Rng;
use rayon::prelude::*;
use tracing::trace;

use crate::matrix::Matrix;
use crate::packed::PackedFieldMatrix;
use crate::ring_matrix::RingMatrix;

pub type FieldMatrix = Matrix<FieldElement>;

/// Which elimination routine evaluates the sampled determinants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Elimination {
    /// One matrix at a time.
    #[default]
    Scalar,
    /// Several matrices in lock-step, one per lane of a wide word.
    Packed,
}

impl Matrix<FieldElement> {
    /// Uniform random matrix, entries possibly zero.
    pub fn random<R: Rng + ?Sized>(field: &Field, n: usize, rng: &mut R) -> Self {
        Self::from_fn(n, |_, _| field.random(rng))
    }

    /// Determinant by Gaussian elimination, leaving `self` in row echelon form.
    ///
    /// Characteristic two makes row swaps sign-free.
    pub fn determinant_in_place(&mut self, field: &Field) -> FieldElement {
        let n = self.n();
        let mut det = field.one();
        for col in 0..n {
            let Some((row, pivot)) =
                (col..n).find_map(|r| self[(r, col)].non_zero().map(|p| (r, p)))
            else {
                return field.zero();
            };
            self.swap_rows(row, col, col);
            det = field.mul(det, pivot.get());
            self.scale_row(field, col, field.inverse(pivot), col);
            for r in col + 1..n {
                let factor = self[(r, col)];
                if !factor.is_zero() {
                    self.row_op(field, col, r, factor, col);
                }
            }
        }
        det
    }

    /// Determinant, leaving `self` untouched.
    pub fn determinant(&self, field: &Field) -> FieldElement {
        self.clone().determinant_in_place(field)
    }

    /// Scale row `r1`, column `c` by `gamma^c` and row `r2`, column `n-1-c`
    /// by `gamma^c`.
    ///
    /// # Panics
    ///
    /// Panics if `r1 == r2` or either row is out of range.
    pub fn mul_gamma(&mut self, field: &Field, r1: usize, r2: usize, gamma: FieldElement) {
        let n = self.n();
        assert_ne!(r1, r2, "mul_gamma needs two distinct rows");
        assert!(r1 < n && r2 < n, "rows ({r1}, {r2}) out of range for size {n}");
        let mut power = gamma;
        for col in 1..n {
            self[(r1, col)] = field.mul(self[(r1, col)], power);
            self[(r2, n - 1 - col)] = field.mul(self[(r2, n - 1 - col)], power);
            power = field.mul(power, gamma);
        }
    }

    /// `det(self after mul_gamma(r1, r2, gamma))` as a polynomial in `gamma`,
    /// of nominal degree `2n - 2`.
    ///
    /// Samples `2n - 1` distinct points, evaluates the determinants in
    /// parallel on fresh copies and interpolates.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::FieldTooSmall`] when the field has fewer than `2n - 1` elements.
    ///
    /// # Panics
    ///
    /// Panics if `r1 == r2` or either row is out of range.
    pub fn polynomial_determinant<R: Rng + ?Sized>(
        &self,
        field: &Field,
        r1: usize,
        r2: usize,
        rng: &mut R,
        elimination: Elimination,
    ) -> AlgebraResult<Polynomial> {
        let n = self.n();
        assert_ne!(r1, r2, "polynomial_determinant needs two distinct rows");
        assert!(r1 < n && r2 < n, "rows ({r1}, {r2}) out of range for size {n}");
        let gammas = field.distinct_elements(2 * n - 1, rng)?;
        let values: Vec<FieldElement> = match elimination {
            Elimination::Scalar => gammas
                .par_iter()
                .map(|&gamma| {
                    let mut sample = self.clone();
                    sample.mul_gamma(field, r1, r2, gamma);
                    sample.determinant_in_place(field)
                })
                .collect(),
            Elimination::Packed => gammas
                .par_chunks(field.lane_layout().lanes())
                .map(|chunk| {
                    let mut packed = PackedFieldMatrix::replicate(field, self, chunk.len());
                    packed.mul_gamma(field, r1, r2, chunk);
                    packed.determinants(field)
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect(),
        };
        trace!(n, r1, r2, samples = gammas.len(), "sampled determinant polynomial");
        interpolate(field, &gammas, &values)
    }

    /// Canonical lift of every entry into the ring.
    pub fn lift(&self) -> RingMatrix {
        self.map(FieldElement::lift)
    }

    /// Lift after multiplying the diagonal by `e`.
    pub fn mul_diag_lift(&self, field: &Field, e: FieldElement) -> RingMatrix {
        let mut lifted = self.lift();
        for i in 0..self.n() {
            lifted[(i, i)] = field.mul(self[(i, i)], e).lift();
        }
        lifted
    }

    /// `project((per - det)(lift(A_e)) / 2)` where `A_e` is `self` with its
    /// diagonal multiplied by `e`.
    ///
    /// Over the field this sums the weight of every cycle cover with an odd
    /// number of even cycles, with each fixed point weighted by an extra `e`.
    pub fn pcc<R: Rng + ?Sized>(
        &self,
        galois: &Galois,
        e: FieldElement,
        rng: &mut R,
        elimination: Elimination,
    ) -> AlgebraResult<FieldElement> {
        let mut lifted = self.mul_diag_lift(galois.field(), e);
        let difference = lifted.per_minus_det(galois, rng, elimination)?;
        difference
            .div2()
            .map(|half| half.project())
            .ok_or(AlgebraError::OddHalving)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn m(field: &Field, rows: &[&[u64]]) -> FieldMatrix {
        Matrix::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|&v| field.element(v).unwrap()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_small_determinants() {
        let field = Field::standard(8).unwrap();
        let e = |v| field.element(v).unwrap();
        let a = m(&field, &[&[3, 5], &[7, 2]]);
        // det = 3*2 + 5*7
        assert_eq!(a.determinant(&field), field.add(field.mul(e(3), e(2)), field.mul(e(5), e(7))));
        assert_eq!(Matrix::identity(&field, 5).determinant(&field), field.one());
        assert_eq!(FieldMatrix::filled(0, field.zero()).determinant(&field), field.one());
    }

    #[test]
    fn test_pivot_search_skips_zero_rows() {
        let field = Field::standard(8).unwrap();
        let a = m(&field, &[&[0, 1, 0], &[0, 0, 1], &[1, 0, 0]]);
        assert_eq!(a.determinant(&field), field.one());
    }

    #[test]
    fn test_singular_is_zero() {
        let field = Field::standard(16).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut a = FieldMatrix::random(&field, 6, &mut rng);
        for col in 0..6 {
            let v = a[(1, col)];
            a[(4, col)] = v;
        }
        assert!(a.determinant(&field).is_zero());
        let zero_column =
            FieldMatrix::from_fn(4, |_, c| if c == 2 { field.zero() } else { field.one() });
        assert!(zero_column.determinant(&field).is_zero());
    }

    #[test]
    fn test_determinant_multiplicative() {
        let field = Field::standard(16).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        for n in 1..8 {
            let a = FieldMatrix::random(&field, n, &mut rng);
            let b = FieldMatrix::random(&field, n, &mut rng);
            assert_eq!(
                a.mul(&field, &b).determinant(&field),
                field.mul(a.determinant(&field), b.determinant(&field))
            );
        }
    }

    #[test]
    fn test_mul_gamma_pattern() {
        let field = Field::standard(8).unwrap();
        let g = field.element(2).unwrap();
        let mut a = FieldMatrix::filled(3, field.one());
        a.mul_gamma(&field, 0, 2, g);
        assert_eq!(a.row(0), &[field.one(), g, field.square(g)]);
        assert_eq!(a.row(1), &[field.one(); 3]);
        assert_eq!(a.row(2), &[field.square(g), g, field.one()]);
    }

    #[test]
    #[should_panic(expected = "two distinct rows")]
    fn test_mul_gamma_same_row_panics() {
        let field = Field::standard(8).unwrap();
        let mut a = FieldMatrix::filled(3, field.one());
        a.mul_gamma(&field, 1, 1, field.one());
    }

    #[test]
    fn test_polynomial_determinant_evaluates() {
        let field = Field::standard(16).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for n in 2..7 {
            let a = FieldMatrix::random(&field, n, &mut rng);
            for elimination in [Elimination::Scalar, Elimination::Packed] {
                let poly = a
                    .polynomial_determinant(&field, 0, n - 1, &mut rng, elimination)
                    .unwrap();
                assert_eq!(poly.degree(), 2 * n - 2);
                let gamma = field.random(&mut rng);
                let mut direct = a.clone();
                direct.mul_gamma(&field, 0, n - 1, gamma);
                assert_eq!(poly.evaluate(&field, gamma), direct.determinant(&field));
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_polynomial_determinant_empty_matrix_panics() {
        let field = Field::standard(8).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let empty = FieldMatrix::filled(0, field.zero());
        let _ = empty.polynomial_determinant(&field, 0, 1, &mut rng, Elimination::Scalar);
    }

    #[test]
    fn test_polynomial_determinant_field_too_small() {
        let field = Field::standard(3).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let a = FieldMatrix::random(&field, 5, &mut rng);
        assert!(matches!(
            a.polynomial_determinant(&field, 0, 1, &mut rng, Elimination::Scalar),
            Err(AlgebraError::FieldTooSmall { required: 9, .. })
        ));
    }

    #[test]
    fn test_mul_diag_lift() {
        let field = Field::standard(8).unwrap();
        let a = m(&field, &[&[3, 5], &[7, 2]]);
        let e = field.element(4).unwrap();
        let lifted = a.mul_diag_lift(&field, e);
        assert_eq!(lifted[(0, 1)], field.element(5).unwrap().lift());
        assert_eq!(lifted[(1, 1)], field.mul(field.element(2).unwrap(), e).lift());
        assert_eq!(lifted.project(), {
            let mut scaled = a.clone();
            scaled[(0, 0)] = field.mul(scaled[(0, 0)], e);
            scaled[(1, 1)] = field.mul(scaled[(1, 1)], e);
            scaled
        });
    }

    #[test]
    fn test_pcc_two_cycle() {
        // Weighted digraph 0 <-> 1: the only cover with an even cycle is the
        // 2-cycle itself, so pcc is the product of its two edge weights.
        let galois = Galois::standard(16).unwrap();
        let field = galois.field();
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let a = m(field, &[&[0x11, 0x22], &[0x33, 0x44]]);
        let expected = field.mul(field.element(0x22).unwrap(), field.element(0x33).unwrap());
        for _ in 0..4 {
            let e = field.random(&mut rng);
            assert_eq!(a.pcc(&galois, e, &mut rng, Elimination::Scalar).unwrap(), expected);
        }
    }
}
