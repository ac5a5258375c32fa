// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Dense univariate polynomials over GF(2^n) and Lagrange interpolation.

use std::collections::HashSet;
use std::fmt;

use crate::errors::{AlgebraError, AlgebraResult};
use crate::field::{Field, FieldElement};

/// A polynomial with a fixed number of coefficient slots.
///
/// The polynomial is represented as:
/// `c_0 + c_1 * x + ... + c_d * x^d`
///
/// where `d` is the nominal degree. The leading coefficient may be zero, so
/// the nominal degree is an upper bound on the true degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    /// Coefficients in ascending order (constant term first).
    coefficients: Vec<FieldElement>,
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (degree, coeff) in self.coefficients.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;

            if degree == 0 || *coeff != FieldElement::ONE {
                write!(f, "{coeff}")?;
            }
            if degree > 0 {
                write!(f, "x")?;
                if degree > 1 {
                    write!(f, "^{degree}")?;
                }
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl Polynomial {
    /// Creates a polynomial from coefficients in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` is empty.
    pub fn new(coefficients: Vec<FieldElement>) -> Self {
        assert!(!coefficients.is_empty(), "a polynomial needs at least one slot");
        Self { coefficients }
    }

    /// Creates a zero polynomial of the given nominal degree.
    ///
    /// # Arguments
    ///
    /// * `degree` - Nominal degree; the polynomial gets `degree + 1` slots.
    pub fn zero(degree: usize) -> Self {
        Self {
            coefficients: vec![FieldElement::ZERO; degree + 1],
        }
    }

    /// `(x + r_0)(x + r_1)...(x + r_{k-1})`, of nominal degree `k`.
    pub fn from_roots(field: &Field, roots: &[FieldElement]) -> Self {
        let mut coefficients = vec![FieldElement::ZERO; roots.len() + 1];
        coefficients[0] = FieldElement::ONE;
        for (k, &root) in roots.iter().enumerate() {
            // Multiply the current degree-k prefix by (x + root).
            for i in (0..=k + 1).rev() {
                let shifted = if i > 0 { coefficients[i - 1] } else { FieldElement::ZERO };
                coefficients[i] = field.add(shifted, field.mul(coefficients[i], root));
            }
        }
        Self { coefficients }
    }

    /// Nominal degree.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients in ascending order.
    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    /// Coefficient of `x^index`, zero past the nominal degree.
    pub fn coefficient(&self, index: usize) -> FieldElement {
        self.coefficients
            .get(index)
            .copied()
            .unwrap_or(FieldElement::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_zero())
    }

    /// Evaluates the polynomial at `x` using Horner's method.
    ///
    /// # Arguments
    ///
    /// * `field` - Field the coefficients live in.
    /// * `x` - Evaluation point.
    ///
    /// # Returns
    ///
    /// The value of the polynomial at `x`.
    pub fn evaluate(&self, field: &Field, x: FieldElement) -> FieldElement {
        self.coefficients
            .iter()
            .rev()
            .fold(FieldElement::ZERO, |acc, &c| field.add(field.mul(acc, x), c))
    }

    /// Divides in place by `(x + v)` with synthetic division.
    ///
    /// The quotient keeps the same number of slots with a zero leading
    /// coefficient. The remainder, `self(v)`, is returned.
    pub fn div_monomial(&mut self, field: &Field, v: FieldElement) -> FieldElement {
        let top = self.degree();
        let mut carry = self.coefficients[top];
        self.coefficients[top] = FieldElement::ZERO;
        for i in (0..top).rev() {
            let current = self.coefficients[i];
            self.coefficients[i] = carry;
            carry = field.add(field.mul(carry, v), current);
        }
        carry
    }

    /// Multiplies every coefficient by `scalar`.
    pub fn scale(&mut self, field: &Field, scalar: FieldElement) {
        for c in &mut self.coefficients {
            *c = field.mul(*c, scalar);
        }
    }

    /// Coefficient-wise sum with a polynomial of the same nominal degree.
    ///
    /// # Panics
    ///
    /// Panics if the nominal degrees differ.
    pub fn add_assign(&mut self, field: &Field, other: &Polynomial) {
        assert_eq!(
            self.degree(),
            other.degree(),
            "polynomial degree mismatch"
        );
        for (a, &b) in self.coefficients.iter_mut().zip(&other.coefficients) {
            *a = field.add(*a, b);
        }
    }

    /// Drops coefficient slots above `degree`.
    pub fn truncate(&mut self, degree: usize) {
        self.coefficients.truncate(degree + 1);
    }

    /// Sum of the coefficients of `x^0 .. x^(count - 1)`.
    pub fn low_coefficient_sum(&self, field: &Field, count: usize) -> FieldElement {
        self.coefficients
            .iter()
            .take(count)
            .fold(FieldElement::ZERO, |acc, &c| field.add(acc, c))
    }
}

/// Interpolates the unique polynomial of nominal degree `points.len() - 1`
/// through `(points[i], values[i])`.
///
/// Uses the barycentric form: with `L(x) = prod (x + p_k)` and weights
/// `w_i = 1 / prod_{k != i} (p_i + p_k)`, the result is
/// `sum_i values[i] * w_i * L(x) / (x + p_i)`.
///
/// # Errors
///
/// Fails on mismatched lengths, empty input or repeated points.
pub fn interpolate(
    field: &Field,
    points: &[FieldElement],
    values: &[FieldElement],
) -> AlgebraResult<Polynomial> {
    if points.len() != values.len() {
        return Err(AlgebraError::LengthMismatch {
            points: points.len(),
            values: values.len(),
        });
    }
    if points.is_empty() {
        return Err(AlgebraError::EmptyInterpolation);
    }
    let mut seen = HashSet::with_capacity(points.len());
    if let Some(duplicate) = points.iter().find(|&&p| !seen.insert(p)) {
        return Err(AlgebraError::DuplicatePoint {
            point: duplicate.value(),
        });
    }

    let count = points.len();
    let master = Polynomial::from_roots(field, points);
    let mut result = Polynomial::zero(count);
    for (i, (&point, &value)) in points.iter().zip(values).enumerate() {
        if value.is_zero() {
            continue;
        }
        let denominator = points
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i)
            .fold(FieldElement::ONE, |acc, (_, &other)| {
                field.mul(acc, field.add(point, other))
            });
        let weight = field.invert(denominator)?;
        let mut basis = master.clone();
        basis.div_monomial(field, point);
        basis.scale(field, field.mul(weight, value));
        result.add_assign(field, &basis);
    }
    result.truncate(count - 1);
    Ok(result)
}
