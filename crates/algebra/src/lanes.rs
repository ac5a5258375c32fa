// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Several field elements packed side by side in one 256-bit word.
//!
//! Fields of degree up to 16 use eight 32-bit slots, so that every slot can
//! hold an unreduced product of two elements. Wider fields use four 64-bit
//! slots.

use crate::field::Field;

/// 256 bits of packed field elements.
pub type WideWord = [u64; 4];

/// Replicated low bit of each 32-bit slot in a `u64`.
const SLOT_LOW_BITS: u64 = 0x0000_0001_0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneLayout {
    /// Eight 32-bit slots.
    Narrow,
    /// Four 64-bit slots.
    Wide,
}

impl LaneLayout {
    pub fn for_degree(degree: u32) -> Self {
        if degree <= 16 {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    /// Number of independent values per word.
    #[inline]
    pub const fn lanes(self) -> usize {
        match self {
            Self::Narrow => 8,
            Self::Wide => 4,
        }
    }

    #[inline]
    pub fn get(self, word: &WideWord, lane: usize) -> u64 {
        match self {
            Self::Narrow => (word[lane / 2] >> (32 * (lane % 2))) & 0xFFFF_FFFF,
            Self::Wide => word[lane],
        }
    }

    #[inline]
    pub fn set(self, word: &mut WideWord, lane: usize, value: u64) {
        match self {
            Self::Narrow => {
                let shift = 32 * (lane % 2);
                let limb = &mut word[lane / 2];
                *limb = (*limb & !(0xFFFF_FFFF << shift)) | ((value & 0xFFFF_FFFF) << shift);
            }
            Self::Wide => word[lane] = value,
        }
    }

    /// The same value in every lane.
    pub fn splat(self, value: u64) -> WideWord {
        let mut word = [0; 4];
        for lane in 0..self.lanes() {
            self.set(&mut word, lane, value);
        }
        word
    }

    /// Bit `i` set iff lane `i` is nonzero.
    pub fn nonzero_lanes(self, word: &WideWord) -> u16 {
        (0..self.lanes())
            .filter(|&lane| self.get(word, lane) != 0)
            .fold(0, |mask, lane| mask | 1 << lane)
    }
}

#[inline]
pub fn wide_xor(a: &WideWord, b: &WideWord) -> WideWord {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Carryless product of both 32-bit slots of `a` and `b`, where `b`'s slots
/// are below `2^bits`. Each slot of the result must not overflow 32 bits.
#[inline]
fn swar_clmul(a: u64, b: u64, bits: u32) -> u64 {
    let mut acc = 0;
    for i in 0..bits {
        let select = ((b >> i) & SLOT_LOW_BITS) * 0xFFFF_FFFF;
        acc ^= (a << i) & select;
    }
    acc
}

impl Field {
    /// Lane-wise product of two packed words.
    pub fn wide_mul(&self, a: &WideWord, b: &WideWord) -> WideWord {
        match self.lane_layout() {
            LaneLayout::Wide => {
                let mut out = [0; 4];
                for (slot, (&x, &y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
                    *slot = self.reduce(self.clmul(x, y));
                }
                out
            }
            LaneLayout::Narrow => {
                let mut out = [0; 4];
                for (slot, (&x, &y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
                    *slot = self.reduce_pair(swar_clmul(x, y, self.degree()));
                }
                out
            }
        }
    }

    /// Reduce both 32-bit slots of a `u64` holding unreduced products.
    #[inline]
    fn reduce_pair(&self, product: u64) -> u64 {
        let slot_mask = SLOT_LOW_BITS * self.mask();
        if self.is_sparse16() {
            let fold = |p: u64| {
                let hi = (p >> 16) & slot_mask;
                (p & slot_mask) ^ hi ^ (hi << 2) ^ (hi << 3) ^ (hi << 5)
            };
            fold(fold(product))
        } else {
            let degree = self.degree();
            let mu = SLOT_LOW_BITS * self.barrett_constant();
            let tail = SLOT_LOW_BITS * self.tail();
            let high = (product >> degree) & slot_mask;
            let quotient = (swar_clmul(high, mu, degree + 1) >> degree) & slot_mask;
            (product ^ swar_clmul(quotient, tail, degree)) & slot_mask
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_lane_get_set() {
        for layout in [LaneLayout::Narrow, LaneLayout::Wide] {
            let mut word = [0; 4];
            for lane in 0..layout.lanes() {
                layout.set(&mut word, lane, lane as u64 + 1);
            }
            for lane in 0..layout.lanes() {
                assert_eq!(layout.get(&word, lane), lane as u64 + 1);
            }
            layout.set(&mut word, 1, 0);
            let expected = ((1u16 << layout.lanes()) - 1) & !0b10;
            assert_eq!(layout.nonzero_lanes(&word), expected);
        }
    }

    #[test]
    fn test_wide_mul_matches_scalar() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for degree in [3, 8, 13, 16, 17, 32] {
            let field = Field::standard(degree).unwrap();
            let layout = field.lane_layout();
            for _ in 0..100 {
                let mut sample = || -> Vec<FieldElement> {
                    (0..layout.lanes()).map(|_| field.random(&mut rng)).collect()
                };
                let (xs, ys) = (sample(), sample());
                let mut a = [0; 4];
                let mut b = [0; 4];
                for lane in 0..layout.lanes() {
                    layout.set(&mut a, lane, xs[lane].value() as u64);
                    layout.set(&mut b, lane, ys[lane].value() as u64);
                }
                let product = field.wide_mul(&a, &b);
                for lane in 0..layout.lanes() {
                    assert_eq!(
                        layout.get(&product, lane),
                        field.mul(xs[lane], ys[lane]).value() as u64,
                        "degree {degree} lane {lane}"
                    );
                }
            }
        }
    }
}
