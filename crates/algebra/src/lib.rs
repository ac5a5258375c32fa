// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Characteristic-two algebra
//!
//! Arithmetic for the binary extension field GF(2^n) and the Galois ring
//! GR(4^n) sharing its modulus, for `3 <= n <= 32`.
//!
//! ## Features
//!
//! - Field and ring contexts with reduction strategies fixed at construction.
//! - Carryless multiplication with a runtime-detected hardware backend and a
//!   portable fallback.
//! - Lane-parallel field multiplication over 256-bit words.
//! - Dense polynomials over the field with barycentric interpolation.
//! - Modulus validation and canonical irreducible search.
//!
//! Elements are plain `Copy` values; every operation takes its context
//! explicitly.

pub mod clmul;
pub mod errors;
pub mod field;
pub mod galois;
pub mod irreducible;
pub mod lanes;
pub mod polynomial;
pub mod ring;
pub mod traits;

pub use clmul::CarrylessBackend;
pub use errors::{AlgebraError, AlgebraResult};
pub use field::{Field, FieldElement, NonZeroFieldElement};
pub use galois::{Galois, GaloisOptions};
pub use irreducible::{
    default_modulus, is_irreducible, smallest_irreducible, GF16_MODULUS, GF32_MODULUS,
};
pub use lanes::{LaneLayout, WideWord};
pub use polynomial::{interpolate, Polynomial};
pub use ring::{Multiplier, Ring, RingElement, RingProduct, Z4Planes};
pub use traits::Algebra;
