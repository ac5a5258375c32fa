// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use tracing::debug;

use crate::clmul::CarrylessBackend;
use crate::errors::{AlgebraError, AlgebraResult};
use crate::field::Field;
use crate::irreducible;
use crate::ring::{Multiplier, Ring, RingElement};

/// Construction options shared by the field and the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GaloisOptions {
    pub backend: Option<CarrylessBackend>,
    pub multiplier: Multiplier,
}

/// A field GF(2^n) together with the ring GR(4^n) over the same modulus.
///
/// Both contexts are immutable and cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Galois {
    field: Field,
    ring: Ring,
}

impl Galois {
    pub fn new(degree: u32, modulus: u64) -> AlgebraResult<Self> {
        Self::with_options(degree, modulus, GaloisOptions::default())
    }

    /// Context over the canonical modulus for `degree`.
    pub fn standard(degree: u32) -> AlgebraResult<Self> {
        Self::new(degree, irreducible::default_modulus(degree)?)
    }

    pub fn with_options(degree: u32, modulus: u64, options: GaloisOptions) -> AlgebraResult<Self> {
        let backend = options.backend.unwrap_or_else(CarrylessBackend::detect);
        let field = Field::with_backend(degree, modulus, backend)?;
        let ring = Ring::with_options(degree, modulus, options.multiplier, backend)?;
        debug!(
            degree,
            modulus,
            backend = ?field.backend(),
            multiplier = ?ring.multiplier(),
            "built Galois context"
        );
        Ok(Self { field, ring })
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[inline]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    #[inline]
    pub fn degree(&self) -> u32 {
        self.field.degree()
    }

    /// `lift(project(sigma)^-1) * v`, the multiplier that clears the odd
    /// part of `v` against the pivot `sigma`.
    ///
    /// # Errors
    ///
    /// [`AlgebraError::EvenPivot`] when `sigma` is not a unit.
    pub fn tau(&self, sigma: RingElement, v: RingElement) -> AlgebraResult<RingElement> {
        let pivot = sigma.project().non_zero().ok_or(AlgebraError::EvenPivot)?;
        Ok(self.ring.mul(self.field.inverse(pivot).lift(), v))
    }
}
