// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The binary extension field GF(2^n) for 3 <= n <= 32.
//!
//! Elements are polynomials over GF(2) of degree below `n`, stored in the
//! low `n` bits of a `u32`. Addition is XOR. Multiplication is a carryless
//! product followed by reduction modulo the field polynomial `g`, using
//! one of three strategies chosen once when the field is built:
//!
//! - closed-form folding for the sparse moduli of degree 16 and 32,
//! - Barrett reduction with a precomputed `floor(x^(2n) / g)` otherwise.

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;

use rand::Rng;
use tracing::warn;

use crate::clmul::CarrylessBackend;
use crate::errors::{AlgebraError, AlgebraResult};
use crate::irreducible::{self, poly_mod, GF16_MODULUS, GF32_MODULUS};
use crate::lanes::LaneLayout;
use crate::traits::Algebra;

/// An element of GF(2^n). The value is always below `2^n` of the field that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct FieldElement(pub(crate) u32);

impl FieldElement {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Raw bit representation.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Proof of non-zeroness, required by [`Field::inverse`].
    #[inline]
    pub fn non_zero(self) -> Option<NonZeroFieldElement> {
        NonZeroU32::new(self.0).map(NonZeroFieldElement)
    }
}

impl From<FieldElement> for u32 {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A field element known to be nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonZeroFieldElement(NonZeroU32);

impl NonZeroFieldElement {
    #[inline]
    pub fn get(self) -> FieldElement {
        FieldElement(self.0.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    Barrett,
    Sparse16,
    Sparse32,
}

/// Arithmetic context for GF(2^n).
#[derive(Debug, Clone)]
pub struct Field {
    degree: u32,
    modulus: u64,
    mask: u64,
    /// floor(x^(2n) / g)
    barrett: u64,
    /// g without its leading term
    tail: u64,
    reduction: Reduction,
    backend: CarrylessBackend,
    layout: LaneLayout,
}

impl Field {
    /// Build GF(2^degree) over `modulus`, using the best carryless backend available.
    ///
    /// # Errors
    ///
    /// Fails when the degree is outside `3..=32` or the modulus is not an
    /// irreducible polynomial of exactly that degree with constant term 1.
    pub fn new(degree: u32, modulus: u64) -> AlgebraResult<Self> {
        Self::with_backend(degree, modulus, CarrylessBackend::detect())
    }

    /// Build GF(2^degree) with the canonical modulus for that degree.
    pub fn standard(degree: u32) -> AlgebraResult<Self> {
        Self::new(degree, irreducible::default_modulus(degree)?)
    }

    /// Build GF(2^degree) with an explicit carryless backend.
    pub fn with_backend(
        degree: u32,
        modulus: u64,
        backend: CarrylessBackend,
    ) -> AlgebraResult<Self> {
        irreducible::validate_modulus(degree, modulus)?;
        let backend = if backend.is_supported() {
            backend
        } else {
            warn!(?backend, "carryless backend unavailable, using portable");
            CarrylessBackend::Portable
        };
        let reduction = match (degree, modulus) {
            (16, GF16_MODULUS) => Reduction::Sparse16,
            (32, GF32_MODULUS) => Reduction::Sparse32,
            _ => Reduction::Barrett,
        };
        let mask = (1u64 << degree) - 1;
        Ok(Self {
            degree,
            modulus,
            mask,
            barrett: barrett_constant(degree, modulus),
            tail: modulus & mask,
            reduction,
            backend,
            layout: LaneLayout::for_degree(degree),
        })
    }

    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of elements, `2^n`.
    #[inline]
    pub fn order(&self) -> u64 {
        1u64 << self.degree
    }

    #[inline]
    pub fn backend(&self) -> CarrylessBackend {
        self.backend
    }

    /// Lane arrangement used by [`Field::wide_mul`].
    #[inline]
    pub fn lane_layout(&self) -> LaneLayout {
        self.layout
    }

    #[inline]
    pub(crate) fn mask(&self) -> u64 {
        self.mask
    }

    #[inline]
    pub(crate) fn barrett_constant(&self) -> u64 {
        self.barrett
    }

    #[inline]
    pub(crate) fn tail(&self) -> u64 {
        self.tail
    }

    #[inline]
    pub(crate) fn is_sparse16(&self) -> bool {
        self.reduction == Reduction::Sparse16
    }

    #[inline]
    pub fn zero(&self) -> FieldElement {
        FieldElement::ZERO
    }

    #[inline]
    pub fn one(&self) -> FieldElement {
        FieldElement::ONE
    }

    /// Checked conversion from raw bits.
    pub fn element(&self, value: u64) -> AlgebraResult<FieldElement> {
        if value > self.mask {
            return Err(AlgebraError::OutOfRange {
                value,
                degree: self.degree,
            });
        }
        Ok(FieldElement(value as u32))
    }

    /// Interpret `value` as a GF(2)[x] polynomial and reduce it into the field.
    pub fn element_from_bits(&self, value: u64) -> FieldElement {
        if value <= self.mask {
            FieldElement(value as u32)
        } else {
            FieldElement(poly_mod(value as u128, self.modulus) as u32)
        }
    }

    #[inline]
    pub fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(a.0 ^ b.0)
    }

    /// Same as [`Field::add`] in characteristic two.
    #[inline]
    pub fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(a.0 ^ b.0)
    }

    #[inline]
    pub fn mul(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(self.reduce(self.clmul(a.0 as u64, b.0 as u64)) as u32)
    }

    #[inline]
    pub fn square(&self, a: FieldElement) -> FieldElement {
        self.mul(a, a)
    }

    pub fn pow(&self, base: FieldElement, mut exponent: u64) -> FieldElement {
        let mut acc = self.one();
        let mut base = base;
        while exponent != 0 {
            if exponent & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.square(base);
            exponent >>= 1;
        }
        acc
    }

    /// Carryless product of two polynomials of degree below `n`.
    #[inline]
    pub fn clmul(&self, a: u64, b: u64) -> u64 {
        self.backend.mul(a, b)
    }

    /// Reduce a polynomial of degree at most `2n - 2` modulo `g`.
    #[inline]
    pub fn reduce(&self, product: u64) -> u64 {
        match self.reduction {
            Reduction::Sparse16 => reduce_sparse16(product),
            Reduction::Sparse32 => reduce_sparse32(product),
            Reduction::Barrett => self.reduce_barrett(product),
        }
    }

    #[inline]
    fn reduce_barrett(&self, product: u64) -> u64 {
        let quotient = self.clmul(product >> self.degree, self.barrett) >> self.degree;
        (product ^ self.clmul(quotient, self.tail)) & self.mask
    }

    /// Multiplicative inverse of a nonzero element.
    ///
    /// Binary extended Euclid: keeps `a * g1 = u` and `a * g2 = v` modulo the
    /// field polynomial while stripping factors of `x` from `u` and `v`.
    pub fn inverse(&self, a: NonZeroFieldElement) -> FieldElement {
        let f = self.modulus;
        let halve = |g: u64| if g & 1 == 0 { g >> 1 } else { (g ^ f) >> 1 };
        let (mut u, mut v) = (a.get().0 as u64, f);
        let (mut g1, mut g2) = (1u64, 0u64);
        while u != 1 && v != 1 {
            let tz = u.trailing_zeros();
            u >>= tz;
            for _ in 0..tz {
                g1 = halve(g1);
            }
            let tz = v.trailing_zeros();
            v >>= tz;
            for _ in 0..tz {
                g2 = halve(g2);
            }
            if u == 1 || v == 1 {
                break;
            }
            if u.leading_zeros() < v.leading_zeros() {
                u ^= v;
                g1 ^= g2;
            } else {
                v ^= u;
                g2 ^= g1;
            }
        }
        FieldElement((if u == 1 { g1 } else { g2 }) as u32)
    }

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::ZeroInverse`] for zero.
    pub fn invert(&self, a: FieldElement) -> AlgebraResult<FieldElement> {
        a.non_zero()
            .map(|a| self.inverse(a))
            .ok_or(AlgebraError::ZeroInverse)
    }

    /// Uniform element, possibly zero.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        FieldElement((rng.gen::<u64>() & self.mask) as u32)
    }

    /// Uniform nonzero element.
    pub fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        loop {
            let candidate = self.random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// `count` pairwise distinct uniform elements, in sampling order.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::FieldTooSmall`] when the field has fewer than `count` elements.
    pub fn distinct_elements<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> AlgebraResult<Vec<FieldElement>> {
        self.ensure_order(count as u64)?;
        let mut seen = HashSet::with_capacity(count);
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let candidate = self.random(rng);
            if seen.insert(candidate) {
                out.push(candidate);
            }
        }
        Ok(out)
    }

    /// Fail unless the field has at least `required` elements.
    pub fn ensure_order(&self, required: u64) -> AlgebraResult<()> {
        if required > self.order() {
            return Err(AlgebraError::FieldTooSmall {
                degree: self.degree,
                required,
                available: self.order(),
            });
        }
        Ok(())
    }
}

impl Algebra for Field {
    type Element = FieldElement;

    fn zero(&self) -> FieldElement {
        FieldElement::ZERO
    }

    fn one(&self) -> FieldElement {
        FieldElement::ONE
    }

    fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        Field::add(self, a, b)
    }

    fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        Field::sub(self, a, b)
    }

    fn neg(&self, a: FieldElement) -> FieldElement {
        a
    }

    fn mul(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        Field::mul(self, a, b)
    }
}

/// floor(x^(2n) / g) by long division.
fn barrett_constant(degree: u32, modulus: u64) -> u64 {
    let mut remainder = 1u128 << (2 * degree);
    let mut quotient = 0u64;
    for shift in (0..=degree).rev() {
        if remainder >> (degree + shift) & 1 == 1 {
            remainder ^= (modulus as u128) << shift;
            quotient |= 1 << shift;
        }
    }
    quotient
}

#[inline]
pub(crate) fn reduce_sparse16(product: u64) -> u64 {
    let fold = |p: u64| {
        let hi = p >> 16;
        (p & 0xFFFF) ^ hi ^ (hi << 2) ^ (hi << 3) ^ (hi << 5)
    };
    fold(fold(product))
}

#[inline]
pub(crate) fn reduce_sparse32(product: u64) -> u64 {
    let fold = |p: u64| {
        let hi = p >> 32;
        (p & 0xFFFF_FFFF) ^ hi ^ (hi << 2) ^ (hi << 3) ^ (hi << 7)
    };
    fold(fold(product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clmul::clmul_portable;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fields() -> Vec<Field> {
        vec![
            Field::standard(3).unwrap(),
            Field::standard(7).unwrap(),
            Field::new(8, 0x11B).unwrap(),
            Field::standard(16).unwrap(),
            Field::standard(23).unwrap(),
            Field::standard(32).unwrap(),
        ]
    }

    #[test]
    fn test_construction_validates() {
        assert!(Field::new(16, 0x1_0001).is_err());
        assert!(Field::new(2, 0b111).is_err());
        assert!(Field::new(33, GF32_MODULUS).is_err());
        assert!(Field::new(16, GF32_MODULUS).is_err());
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(Field::standard(16).unwrap().reduction, Reduction::Sparse16);
        assert_eq!(Field::standard(32).unwrap().reduction, Reduction::Sparse32);
        assert_eq!(Field::standard(12).unwrap().reduction, Reduction::Barrett);
    }

    #[test]
    fn test_aes_products() {
        let field = Field::new(8, 0x11B).unwrap();
        let e = |v| field.element(v).unwrap();
        assert_eq!(field.mul(e(0x57), e(0x83)), e(0xC1));
        assert_eq!(field.mul(e(0x53), e(0xCA)), e(0x01));
        assert_eq!(field.invert(e(0x53)).unwrap(), e(0xCA));
    }

    #[test]
    fn test_reductions_match_long_division() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for field in fields() {
            for _ in 0..500 {
                let a = field.random(&mut rng).0 as u64;
                let b = field.random(&mut rng).0 as u64;
                let product = clmul_portable(a, b);
                let expected = poly_mod(product as u128, field.modulus());
                assert_eq!(field.reduce(product), expected, "degree {}", field.degree());
                assert_eq!(field.reduce_barrett(product), expected);
            }
        }
    }

    #[test]
    fn test_inverse_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for field in fields() {
            for _ in 0..200 {
                let a = field.random_nonzero(&mut rng);
                let inv = field.invert(a).unwrap();
                assert_eq!(field.mul(a, inv), field.one());
            }
            assert_eq!(field.invert(field.one()).unwrap(), field.one());
        }
    }

    #[test]
    fn test_inverse_exhaustive_small() {
        let field = Field::standard(5).unwrap();
        for v in 1..32 {
            let a = field.element(v).unwrap();
            assert_eq!(field.mul(a, field.invert(a).unwrap()), field.one());
        }
    }

    #[test]
    fn test_invert_zero_fails() {
        let field = Field::standard(16).unwrap();
        assert_eq!(field.invert(field.zero()), Err(AlgebraError::ZeroInverse));
    }

    #[test]
    fn test_frobenius_fixes_field() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for field in fields() {
            let a = field.random(&mut rng);
            assert_eq!(field.pow(a, field.order()), a);
        }
    }

    #[test]
    fn test_portable_backend_agrees() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let fast = Field::standard(32).unwrap();
        let portable = Field::with_backend(32, GF32_MODULUS, CarrylessBackend::Portable).unwrap();
        for _ in 0..200 {
            let a = fast.random(&mut rng);
            let b = fast.random(&mut rng);
            assert_eq!(fast.mul(a, b), portable.mul(a, b));
        }
    }

    #[test]
    fn test_element_range() {
        let field = Field::standard(16).unwrap();
        assert!(field.element(0xFFFF).is_ok());
        assert_eq!(
            field.element(0x1_0000),
            Err(AlgebraError::OutOfRange {
                value: 0x1_0000,
                degree: 16
            })
        );
        // x^16 reduces to x^5 + x^3 + x^2 + 1
        assert_eq!(field.element_from_bits(0x1_0000).value(), 0x2D);
    }

    #[test]
    fn test_distinct_elements() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let field = Field::standard(3).unwrap();
        let all = field.distinct_elements(8, &mut rng).unwrap();
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        assert!(matches!(
            field.distinct_elements(9, &mut rng),
            Err(AlgebraError::FieldTooSmall {
                required: 9,
                available: 8,
                ..
            })
        ));
    }

    fn arb_triple(degree: u32) -> impl Strategy<Value = (u32, u32, u32)> {
        let max = ((1u64 << degree) - 1) as u32;
        (0..=max, 0..=max, 0..=max)
    }

    proptest! {
        #[test]
        fn test_field_axioms_16((a, b, c) in arb_triple(16)) {
            let field = Field::standard(16).unwrap();
            let (a, b, c) = (FieldElement(a), FieldElement(b), FieldElement(c));
            prop_assert_eq!(field.mul(a, b), field.mul(b, a));
            prop_assert_eq!(field.mul(field.mul(a, b), c), field.mul(a, field.mul(b, c)));
            prop_assert_eq!(
                field.mul(a, field.add(b, c)),
                field.add(field.mul(a, b), field.mul(a, c))
            );
            prop_assert_eq!(field.mul(a, field.one()), a);
        }

        #[test]
        fn test_field_axioms_32((a, b, c) in arb_triple(32)) {
            let field = Field::standard(32).unwrap();
            let (a, b, c) = (FieldElement(a), FieldElement(b), FieldElement(c));
            prop_assert_eq!(field.mul(field.mul(a, b), c), field.mul(a, field.mul(b, c)));
            prop_assert_eq!(
                field.mul(field.add(a, b), c),
                field.add(field.mul(a, c), field.mul(b, c))
            );
        }

        #[test]
        fn test_field_axioms_barrett((a, b, c) in arb_triple(13)) {
            let field = Field::standard(13).unwrap();
            let (a, b, c) = (FieldElement(a), FieldElement(b), FieldElement(c));
            prop_assert_eq!(field.mul(field.mul(a, b), c), field.mul(a, field.mul(b, c)));
            prop_assert_eq!(
                field.mul(a, field.add(b, c)),
                field.add(field.mul(a, b), field.mul(a, c))
            );
        }
    }
}
