// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for field, ring and polynomial operations.

use thiserror::Error;

/// Errors that can occur while constructing or using an algebraic context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// Extension degree outside the supported range
    #[error("Invalid degree {degree}: supported degrees are {min}..={max}")]
    InvalidDegree { degree: u32, min: u32, max: u32 },

    /// Modulus does not have the shape required for the requested degree
    #[error("Invalid modulus {modulus:#x} for degree {degree}: {message}")]
    InvalidModulus {
        modulus: u64,
        degree: u32,
        message: String,
    },

    /// Modulus factors over GF(2)
    #[error("Modulus {modulus:#x} is reducible over GF(2)")]
    ReducibleModulus { modulus: u64 },

    /// Raw value does not fit the element width
    #[error("Value {value:#x} does not fit in {degree} bits")]
    OutOfRange { value: u64, degree: u32 },

    /// Inversion of the zero element
    #[error("Zero has no multiplicative inverse")]
    ZeroInverse,

    /// Ring pivot is not a unit
    #[error("Ring pivot is even and cannot be inverted")]
    EvenPivot,

    /// Halving an element that is not a multiple of two
    #[error("Cannot halve an odd ring element")]
    OddHalving,

    /// Not enough distinct field elements for the requested sample
    #[error(
        "Field GF(2^{degree}) has {available} elements but {required} distinct points are needed"
    )]
    FieldTooSmall {
        degree: u32,
        required: u64,
        available: u64,
    },

    /// Interpolation inputs of different lengths
    #[error("Length mismatch: {points} points but {values} values")]
    LengthMismatch { points: usize, values: usize },

    /// Interpolation without any points
    #[error("Interpolation requires at least one point")]
    EmptyInterpolation,

    /// Interpolation point given twice
    #[error("Interpolation point {point:#x} appears more than once")]
    DuplicatePoint { point: u32 },
}

impl AlgebraError {
    pub fn invalid_modulus(modulus: u64, degree: u32, message: impl Into<String>) -> Self {
        Self::InvalidModulus {
            modulus,
            degree,
            message: message.into(),
        }
    }
}

/// Result type for algebraic operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;
