// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Several same-sized field matrices eliminated in lock-step.
//!
//! Lane `i` of every entry word belongs to matrix `i`. Elimination proceeds
//! on all live lanes at once as long as a common pivot row exists. A lane
//! whose column runs out of nonzero entries has determinant zero; a lane
//! that needs a different pivot row than the others finishes on its own
//! with the scalar routine.

use evencycle_algebra::{lanes::wide_xor, Field, FieldElement, LaneLayout, WideWord};
use tracing::debug;

use crate::field_matrix::FieldMatrix;

#[derive(Clone, Debug)]
pub struct PackedFieldMatrix {
    n: usize,
    layout: LaneLayout,
    used: usize,
    entries: Vec<WideWord>,
}

fn lanes_in(mask: u16) -> impl Iterator<Item = usize> {
    (0..16).filter(move |lane| mask >> lane & 1 == 1)
}

impl PackedFieldMatrix {
    /// Pack up to `field.lane_layout().lanes()` matrices; free lanes hold the identity.
    ///
    /// # Panics
    ///
    /// Panics if `matrices` is empty, too long, or the sizes differ.
    pub fn from_lanes(field: &Field, matrices: &[FieldMatrix]) -> Self {
        let layout = field.lane_layout();
        assert!(
            !matrices.is_empty() && matrices.len() <= layout.lanes(),
            "between 1 and {} matrices fit in one packed matrix",
            layout.lanes()
        );
        let n = matrices[0].n();
        assert!(matrices.iter().all(|m| m.n() == n), "matrix size mismatch");
        let mut entries = vec![[0u64; 4]; n * n];
        for row in 0..n {
            for col in 0..n {
                let word = &mut entries[row * n + col];
                for lane in 0..layout.lanes() {
                    let value = match matrices.get(lane) {
                        Some(m) => m[(row, col)].value() as u64,
                        None => (row == col) as u64,
                    };
                    layout.set(word, lane, value);
                }
            }
        }
        Self {
            n,
            layout,
            used: matrices.len(),
            entries,
        }
    }

    /// `copies` lanes holding the same matrix.
    pub fn replicate(field: &Field, base: &FieldMatrix, copies: usize) -> Self {
        Self::from_lanes(field, &vec![base.clone(); copies])
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of lanes holding caller matrices.
    pub fn lanes(&self) -> usize {
        self.used
    }

    /// The matrix stored in `lane`.
    pub fn unpack(&self, field: &Field, lane: usize) -> FieldMatrix {
        assert!(lane < self.used, "lane {lane} is not in use");
        FieldMatrix::from_fn(self.n, |r, c| self.lane_value(field, r * self.n + c, lane))
    }

    #[inline]
    fn lane_value(&self, field: &Field, index: usize, lane: usize) -> FieldElement {
        field.element_from_bits(self.layout.get(&self.entries[index], lane))
    }

    /// Per-lane [`FieldMatrix::mul_gamma`] with `gammas[i]` for lane `i`.
    pub fn mul_gamma(&mut self, field: &Field, r1: usize, r2: usize, gammas: &[FieldElement]) {
        let n = self.n;
        assert_ne!(r1, r2, "mul_gamma needs two distinct rows");
        assert_eq!(gammas.len(), self.used, "one gamma per lane in use");
        let mut gamma = self.layout.splat(1);
        for (lane, g) in gammas.iter().enumerate() {
            self.layout.set(&mut gamma, lane, g.value() as u64);
        }
        let mut power = gamma;
        for col in 1..n {
            let a = r1 * n + col;
            let b = r2 * n + (n - 1 - col);
            self.entries[a] = field.wide_mul(&self.entries[a], &power);
            self.entries[b] = field.wide_mul(&self.entries[b], &power);
            power = field.wide_mul(&power, &gamma);
        }
    }

    /// Determinant of every lane in use. Consumes the packed matrix.
    pub fn determinants(mut self, field: &Field) -> Vec<FieldElement> {
        let n = self.n;
        let lanes = self.layout.lanes();
        let mut det = vec![field.one(); lanes];
        let mut live: u16 = ((1u32 << self.used) - 1) as u16;

        for col in 0..n {
            if live == 0 {
                break;
            }
            let masks: Vec<u16> = (col..n)
                .map(|r| self.layout.nonzero_lanes(&self.entries[r * n + col]) & live)
                .collect();
            let reachable = masks.iter().fold(0, |acc, m| acc | m);
            for lane in lanes_in(live & !reachable) {
                det[lane] = field.zero();
            }
            live &= reachable;
            if live == 0 {
                break;
            }

            let offset = match masks.iter().position(|&m| m == live) {
                Some(offset) => offset,
                None => {
                    // Take the row covering most lanes; the rest finish alone.
                    let (offset, best) = masks
                        .iter()
                        .enumerate()
                        .fold((0, 0u16), |(bo, bm), (o, &m)| {
                            if m.count_ones() > bm.count_ones() {
                                (o, m)
                            } else {
                                (bo, bm)
                            }
                        });
                    let divergent = live & !best;
                    debug!(col, divergent = divergent.count_ones(), "packed lanes diverged");
                    for lane in lanes_in(divergent) {
                        let rest = self.trailing_lane(field, lane, col).determinant_in_place(field);
                        det[lane] = field.mul(det[lane], rest);
                    }
                    live = best;
                    offset
                }
            };
            let pivot_row = col + offset;
            if pivot_row != col {
                for c in 0..n {
                    self.entries.swap(pivot_row * n + c, col * n + c);
                }
            }

            let pivot = self.entries[col * n + col];
            let mut inverse = [0u64; 4];
            for lane in lanes_in(live) {
                let value = field.element_from_bits(self.layout.get(&pivot, lane));
                if let Some(nonzero) = value.non_zero() {
                    det[lane] = field.mul(det[lane], value);
                    self.layout.set(&mut inverse, lane, field.inverse(nonzero).value() as u64);
                }
            }
            for c in col..n {
                let idx = col * n + c;
                self.entries[idx] = field.wide_mul(&self.entries[idx], &inverse);
            }
            for r in col + 1..n {
                let factor = self.entries[r * n + col];
                if factor.iter().all(|&w| w == 0) {
                    continue;
                }
                for c in col..n {
                    let product = field.wide_mul(&self.entries[col * n + c], &factor);
                    let idx = r * n + c;
                    self.entries[idx] = wide_xor(&self.entries[idx], &product);
                }
            }
        }

        det.truncate(self.used);
        det
    }

    fn trailing_lane(&self, field: &Field, lane: usize, from: usize) -> FieldMatrix {
        let size = self.n - from;
        FieldMatrix::from_fn(size, |r, c| {
            self.lane_value(field, (r + from) * self.n + c + from, lane)
        })
    }
}
