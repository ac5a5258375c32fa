// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Dense matrices over GF(2^n) and GR(4^n)
//!
//! - [`Matrix`]: a generic square matrix with elementary row operations.
//! - [`FieldMatrix`]: determinant, determinant polynomial in a row-scaling
//!   indeterminate, and the cycle-cover evaluation `pcc`.
//! - [`PackedFieldMatrix`]: several field matrices eliminated in lock-step.
//! - [`RingMatrix`]: permanent minus determinant over the Galois ring.

pub mod field_matrix;
pub mod matrix;
pub mod packed;
pub mod ring_matrix;

pub use field_matrix::{Elimination, FieldMatrix};
pub use matrix::Matrix;
pub use packed::PackedFieldMatrix;
pub use ring_matrix::{is_odd_permutation, RingMatrix};
