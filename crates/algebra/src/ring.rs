// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The Galois ring GR(4^n) = Z4[x] / (g).
//!
//! Elements are polynomials with coefficients in Z4, stored as two bit
//! planes: coefficient `i` equals `lo_i + 2 * hi_i`. The modulus has the same
//! bit pattern as the field modulus, read coefficient-wise in Z4, so
//! reducing an element mod 2 (its `lo` plane) lands in GF(2^n).
//!
//! Multiplication forms an unreduced product ([`RingProduct`]) with one of
//! three interchangeable strategies and then reduces it:
//!
//! - [`Multiplier::Reference`]: shift-and-add over the bits of one operand.
//! - [`Multiplier::Carryless`]: three carryless products for the planes plus
//!   the carry plane of `lo * lo`.
//! - [`Multiplier::Kronecker`]: spread both operands into 9-bit slots of a
//!   576-bit integer, multiply once, read back the low two bits of each slot.
//!
//! Barrett reduction is the production path, with closed forms for the
//! sparse degree-16 and degree-32 moduli. Euclidean and Montgomery
//! reduction are kept as independent cross-checks.

use std::fmt;

use num_traits::PrimInt;
use rand::Rng;
use ruint::Uint;
use tracing::warn;

use crate::clmul::CarrylessBackend;
use crate::errors::{AlgebraError, AlgebraResult};
use crate::field::FieldElement;
use crate::irreducible::{self, GF16_MODULUS, GF32_MODULUS};
use crate::traits::Algebra;

/// Kronecker carrier: 63 slots of 9 bits.
type Spread = Uint<576, 9>;

/// Polynomial over Z4 in bit-plane form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Z4Planes<W> {
    pub lo: W,
    pub hi: W,
}

/// Unreduced product of two ring elements.
pub type RingProduct = Z4Planes<u64>;

impl<W: PrimInt> Z4Planes<W> {
    #[inline]
    pub fn new(lo: W, hi: W) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(W::zero(), W::zero())
    }

    /// `c * x^index` for a coefficient `c` in Z4.
    #[inline]
    pub fn monomial(index: usize, coefficient: u8) -> Self {
        let bit = W::one() << index;
        let pick = |set: bool| if set { bit } else { W::zero() };
        Self::new(pick(coefficient & 1 == 1), pick(coefficient & 2 == 2))
    }

    #[inline]
    pub fn add(self, other: Self) -> Self {
        let carry = self.lo & other.lo;
        Self::new(self.lo ^ other.lo, self.hi ^ other.hi ^ carry)
    }

    #[inline]
    pub fn neg(self) -> Self {
        Self::new(self.lo, self.hi ^ self.lo)
    }

    #[inline]
    pub fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    #[inline]
    pub fn shl(self, bits: usize) -> Self {
        Self::new(self.lo << bits, self.hi << bits)
    }

    #[inline]
    pub fn shr(self, bits: usize) -> Self {
        Self::new(self.lo >> bits, self.hi >> bits)
    }

    #[inline]
    pub fn mask(self, mask: W) -> Self {
        Self::new(self.lo & mask, self.hi & mask)
    }

    /// Coefficient of `x^index`, in `0..4`.
    #[inline]
    pub fn coefficient(self, index: usize) -> u8 {
        let bit = |plane: W| ((plane >> index) & W::one()) == W::one();
        bit(self.lo) as u8 | (bit(self.hi) as u8) << 1
    }

    /// Multiply every coefficient by a Z4 constant.
    #[inline]
    pub fn scale(self, coefficient: u8) -> Self {
        match coefficient & 3 {
            0 => Self::zero(),
            1 => self,
            2 => Self::new(W::zero(), self.lo),
            _ => self.neg(),
        }
    }
}

/// An element of GR(4^n).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RingElement {
    pub(crate) lo: u32,
    pub(crate) hi: u32,
}

impl RingElement {
    pub const ZERO: Self = Self { lo: 0, hi: 0 };
    pub const ONE: Self = Self { lo: 1, hi: 0 };

    #[inline]
    pub const fn lo(self) -> u32 {
        self.lo
    }

    #[inline]
    pub const fn hi(self) -> u32 {
        self.hi
    }

    /// Divisible by 2, i.e. not a unit.
    #[inline]
    pub const fn is_even(self) -> bool {
        self.lo == 0
    }

    #[inline]
    pub const fn is_odd(self) -> bool {
        self.lo != 0
    }

    /// Reduction mod 2 into GF(2^n).
    #[inline]
    pub const fn project(self) -> FieldElement {
        FieldElement(self.lo)
    }

    /// `self / 2`, defined only for even elements.
    #[inline]
    pub fn div2(self) -> Option<RingElement> {
        self.is_even().then_some(RingElement {
            lo: self.hi,
            hi: 0,
        })
    }

    #[inline]
    fn planes(self) -> RingProduct {
        Z4Planes::new(self.lo as u64, self.hi as u64)
    }
}

impl FieldElement {
    /// Canonical lift into GR(4^n), coefficients 0 and 1.
    #[inline]
    pub const fn lift(self) -> RingElement {
        RingElement { lo: self.0, hi: 0 }
    }
}

impl fmt::Display for RingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:#x}, {:#x})", self.lo, self.hi)
    }
}

/// How unreduced ring products are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Multiplier {
    Reference,
    Carryless,
    #[default]
    Kronecker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    Barrett,
    Sparse16,
    Sparse32,
}

/// Constants for Montgomery reduction with `R = x^n`.
#[derive(Debug, Clone, Copy)]
struct Montgomery {
    /// -g^(-1) mod x^n
    n_prime: RingProduct,
    /// x^(2n) mod g
    r_squared: RingProduct,
}

/// Arithmetic context for GR(4^n).
#[derive(Debug, Clone)]
pub struct Ring {
    degree: u32,
    modulus: u64,
    mask: u64,
    /// floor(x^(2n) / g) over Z4 without its leading `x^n`
    barrett: RingProduct,
    /// g without its leading term
    tail: RingProduct,
    montgomery: Montgomery,
    slot_width: u32,
    reduction: Reduction,
    multiplier: Multiplier,
    backend: CarrylessBackend,
}

impl Ring {
    /// Build GR(4^degree) with the default multiplier and detected backend.
    pub fn new(degree: u32, modulus: u64) -> AlgebraResult<Self> {
        Self::with_options(
            degree,
            modulus,
            Multiplier::default(),
            CarrylessBackend::detect(),
        )
    }

    /// Build GR(4^degree) with the canonical modulus for that degree.
    pub fn standard(degree: u32) -> AlgebraResult<Self> {
        Self::new(degree, irreducible::default_modulus(degree)?)
    }

    /// # Errors
    ///
    /// Same validation as [`crate::Field::new`]: the modulus must be
    /// irreducible mod 2 and of exact degree `degree`.
    pub fn with_options(
        degree: u32,
        modulus: u64,
        multiplier: Multiplier,
        backend: CarrylessBackend,
    ) -> AlgebraResult<Self> {
        irreducible::validate_modulus(degree, modulus)?;
        let backend = if backend.is_supported() {
            backend
        } else {
            warn!(?backend, "carryless backend unavailable, using portable");
            CarrylessBackend::Portable
        };
        let mask = (1u64 << degree) - 1;
        let tail = Z4Planes::new(modulus & mask, 0);
        let (quotient, remainder) = divide_power(degree, modulus);
        let reduction = match (degree, modulus) {
            (16, GF16_MODULUS) => Reduction::Sparse16,
            (32, GF32_MODULUS) => Reduction::Sparse32,
            _ => Reduction::Barrett,
        };
        let mut ring = Self {
            degree,
            modulus,
            mask,
            barrett: Z4Planes::new(quotient.lo as u64 & mask, quotient.hi as u64 & mask),
            tail,
            montgomery: Montgomery {
                n_prime: RingProduct::zero(),
                r_squared: Z4Planes::new(remainder.lo as u64, remainder.hi as u64),
            },
            slot_width: u32::BITS - (9 * (degree + 1)).leading_zeros(),
            reduction,
            multiplier,
            backend,
        };
        ring.montgomery.n_prime = ring.negated_inverse_of_modulus();
        Ok(ring)
    }

    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    #[inline]
    pub fn zero(&self) -> RingElement {
        RingElement::ZERO
    }

    #[inline]
    pub fn one(&self) -> RingElement {
        RingElement::ONE
    }

    /// Checked construction from bit planes.
    pub fn element(&self, lo: u64, hi: u64) -> AlgebraResult<RingElement> {
        for value in [lo, hi] {
            if value > self.mask {
                return Err(AlgebraError::OutOfRange {
                    value,
                    degree: self.degree,
                });
            }
        }
        Ok(RingElement {
            lo: lo as u32,
            hi: hi as u32,
        })
    }

    #[inline]
    pub fn add(&self, a: RingElement, b: RingElement) -> RingElement {
        let carry = a.lo & b.lo;
        RingElement {
            lo: a.lo ^ b.lo,
            hi: a.hi ^ b.hi ^ carry,
        }
    }

    #[inline]
    pub fn neg(&self, a: RingElement) -> RingElement {
        RingElement {
            lo: a.lo,
            hi: a.hi ^ a.lo,
        }
    }

    #[inline]
    pub fn sub(&self, a: RingElement, b: RingElement) -> RingElement {
        self.add(a, self.neg(b))
    }

    /// `2 * a`
    #[inline]
    pub fn double(&self, a: RingElement) -> RingElement {
        RingElement { lo: 0, hi: a.lo }
    }

    #[inline]
    pub fn mul(&self, a: RingElement, b: RingElement) -> RingElement {
        self.to_element(self.rem(self.raw_mul(a, b)))
    }

    /// Uniform element, both planes random.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> RingElement {
        RingElement {
            lo: (rng.gen::<u64>() & self.mask) as u32,
            hi: (rng.gen::<u64>() & self.mask) as u32,
        }
    }

    /// Uniform unit.
    pub fn random_odd<R: Rng + ?Sized>(&self, rng: &mut R) -> RingElement {
        loop {
            let candidate = self.random(rng);
            if candidate.is_odd() {
                return candidate;
            }
        }
    }

    #[inline]
    fn to_element(&self, reduced: RingProduct) -> RingElement {
        RingElement {
            lo: reduced.lo as u32,
            hi: reduced.hi as u32,
        }
    }

    /// Unreduced product using the configured strategy.
    #[inline]
    pub fn raw_mul(&self, a: RingElement, b: RingElement) -> RingProduct {
        match self.multiplier {
            Multiplier::Reference => self.mul_reference(a, b),
            Multiplier::Carryless => self.mul_carryless(a, b),
            Multiplier::Kronecker => self.mul_kronecker(a, b),
        }
    }

    pub fn mul_reference(&self, a: RingElement, b: RingElement) -> RingProduct {
        let a = a.planes();
        let mut acc = RingProduct::zero();
        for i in 0..self.degree as usize {
            if (b.lo >> i) & 1 == 1 {
                acc = acc.add(a.shl(i));
            }
            if (b.hi >> i) & 1 == 1 {
                acc.hi ^= a.lo << i;
            }
        }
        acc
    }

    /// The `lo * lo` carry plane is `C(c_k, 2) mod 2` where `c_k` counts the
    /// index pairs contributing to coefficient `k`; each unordered pair of
    /// such pairs is found once per distance `d`.
    pub fn mul_carryless(&self, a: RingElement, b: RingElement) -> RingProduct {
        let clmul = |x: u32, y: u32| self.backend.mul(x as u64, y as u64);
        let (al, ah, bl, bh) = (a.lo, a.hi, b.lo, b.hi);
        let mut carry = 0;
        for d in 1..self.degree {
            let left = al & (al << d);
            let right = bl & (bl >> d);
            if left != 0 && right != 0 {
                carry ^= clmul(left, right);
            }
        }
        Z4Planes::new(
            clmul(al, bl),
            carry ^ clmul(al, bh) ^ clmul(ah, bl),
        )
    }

    pub fn mul_kronecker(&self, a: RingElement, b: RingElement) -> RingProduct {
        let width = self.slot_width as usize;
        let product = self.spread(a).wrapping_mul(self.spread(b));
        let mut out = RingProduct::zero();
        for k in 0..(2 * self.degree as usize).saturating_sub(1) {
            let slot = (product >> (k * width)).as_limbs()[0] & 3;
            out.lo |= (slot & 1) << k;
            out.hi |= (slot >> 1) << k;
        }
        out
    }

    fn spread(&self, a: RingElement) -> Spread {
        let width = self.slot_width as usize;
        let mut wide = Spread::ZERO;
        for i in 0..self.degree as usize {
            if (a.lo >> i) & 1 == 1 {
                wide.set_bit(i * width, true);
            }
            if (a.hi >> i) & 1 == 1 {
                wide.set_bit(i * width + 1, true);
            }
        }
        wide
    }

    /// Reduce a product of degree at most `2n - 2` using the configured strategy.
    #[inline]
    pub fn rem(&self, product: RingProduct) -> RingProduct {
        match self.reduction {
            Reduction::Sparse16 => self.rem_sparse(product, &[2, 3, 5]),
            Reduction::Sparse32 => self.rem_sparse(product, &[2, 3, 7]),
            Reduction::Barrett => self.rem_barrett(product),
        }
    }

    /// `q = floor(high * mu / x^n)` is the exact quotient because the
    /// modulus is monic; `mu = x^n + barrett` is split to stay in 32 bits.
    pub fn rem_barrett(&self, product: RingProduct) -> RingProduct {
        let n = self.degree as usize;
        let high = product.shr(n).mask(self.mask);
        let low = product.mask(self.mask);
        let quotient = high
            .add(self.mul_carryless_wide(high, self.barrett).shr(n))
            .mask(self.mask);
        low.sub(self.mul_carryless_wide(quotient, self.tail).mask(self.mask))
    }

    /// `x^n = -(tail)`: fold the high part back twice.
    fn rem_sparse(&self, product: RingProduct, shifts: &[usize]) -> RingProduct {
        let n = self.degree as usize;
        let fold = |p: RingProduct| {
            let high = p.shr(n);
            let mut low = p.mask(self.mask).sub(high);
            for &shift in shifts {
                low = low.sub(high.shl(shift));
            }
            low
        };
        fold(fold(product))
    }

    /// Schoolbook division, one leading coefficient at a time.
    pub fn rem_euclid(&self, product: RingProduct) -> RingProduct {
        let n = self.degree as usize;
        let g = Z4Planes::new(self.modulus, 0);
        let mut rem = product;
        for i in (n..64).rev() {
            let c = rem.coefficient(i);
            if c != 0 {
                rem = rem.sub(g.shl(i - n).scale(c));
            }
        }
        rem
    }

    /// Map into Montgomery form, `a * x^n mod g`.
    pub fn mont_form(&self, a: RingElement) -> RingElement {
        let product = self.mul_carryless_wide(a.planes(), self.montgomery.r_squared);
        self.to_element(self.mont_rem(product))
    }

    /// `t * x^(-n) mod g` for `t` of degree below `2n`.
    pub fn mont_rem(&self, t: RingProduct) -> RingProduct {
        let n = self.degree as usize;
        let m = self
            .mul_carryless_wide(t.mask(self.mask), self.montgomery.n_prime)
            .mask(self.mask);
        let mg = self.mul_carryless_wide(m, self.tail).add(m.shl(n));
        t.add(mg).shr(n)
    }

    /// Leave Montgomery form.
    pub fn mont_reduce(&self, a: RingElement) -> RingElement {
        self.to_element(self.mont_rem(a.planes()))
    }

    /// Newton iteration `inv <- inv * (2 - g * inv)` doubles the number of
    /// correct low coefficients each round, starting from `g(0) = 1`.
    fn negated_inverse_of_modulus(&self) -> RingProduct {
        let two = Z4Planes::new(0, 1);
        let mut inv = RingProduct::new(1, 0);
        for _ in 0..6 {
            let correction = two.sub(self.mul_carryless_wide(self.tail, inv).mask(self.mask));
            inv = self.mul_carryless_wide(inv, correction).mask(self.mask);
        }
        inv.neg()
    }

    /// Carryless-strategy product of two operands below degree `n`.
    fn mul_carryless_wide(&self, a: RingProduct, b: RingProduct) -> RingProduct {
        self.mul_carryless(
            RingElement {
                lo: a.lo as u32,
                hi: a.hi as u32,
            },
            RingElement {
                lo: b.lo as u32,
                hi: b.hi as u32,
            },
        )
    }
}

impl Algebra for Ring {
    type Element = RingElement;

    fn zero(&self) -> RingElement {
        RingElement::ZERO
    }

    fn one(&self) -> RingElement {
        RingElement::ONE
    }

    fn add(&self, a: RingElement, b: RingElement) -> RingElement {
        Ring::add(self, a, b)
    }

    fn sub(&self, a: RingElement, b: RingElement) -> RingElement {
        Ring::sub(self, a, b)
    }

    fn neg(&self, a: RingElement) -> RingElement {
        Ring::neg(self, a)
    }

    fn mul(&self, a: RingElement, b: RingElement) -> RingElement {
        Ring::mul(self, a, b)
    }
}

/// Quotient and remainder of `x^(2n)` by the monic modulus over Z4.
fn divide_power(degree: u32, modulus: u64) -> (Z4Planes<u128>, Z4Planes<u128>) {
    let n = degree as usize;
    let g = Z4Planes::<u128>::new(modulus as u128, 0);
    let mut rem = Z4Planes::<u128>::monomial(2 * n, 1);
    let mut quotient = Z4Planes::<u128>::zero();
    for i in (n..=2 * n).rev() {
        let c = rem.coefficient(i);
        if c != 0 {
            rem = rem.sub(g.shl(i - n).scale(c));
            quotient = quotient.add(Z4Planes::monomial(i - n, c));
        }
    }
    (quotient, rem)
}
