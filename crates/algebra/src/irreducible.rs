// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Modulus selection and validation for GF(2^n).

use crate::clmul::clmul_portable;
use crate::errors::{AlgebraError, AlgebraResult};

/// Smallest supported extension degree.
pub const MIN_DEGREE: u32 = 3;
/// Largest supported extension degree.
pub const MAX_DEGREE: u32 = 32;

/// x^16 + x^5 + x^3 + x^2 + 1
pub const GF16_MODULUS: u64 = 0x1_002D;
/// x^32 + x^7 + x^3 + x^2 + 1
pub const GF32_MODULUS: u64 = 0x1_0000_008D;

/// Degree of a nonzero GF(2)[x] polynomial.
#[inline]
pub(crate) fn degree(poly: u128) -> u32 {
    127 - poly.leading_zeros()
}

/// Remainder of `a` modulo `m` by long division.
pub(crate) fn poly_mod(mut a: u128, m: u64) -> u64 {
    let m = m as u128;
    let dm = degree(m);
    while a != 0 && degree(a) >= dm {
        a ^= m << (degree(a) - dm);
    }
    a as u64
}

fn poly_gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = poly_mod(a as u128, b);
        a = b;
        b = r;
    }
    a
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    // Operands are below degree 32, so the product fits in 64 bits.
    poly_mod(clmul_portable(a, b) as u128, m)
}

/// Ben-Or irreducibility test over GF(2).
///
/// A polynomial of degree `d` is irreducible iff it shares no factor with
/// `x^(2^i) - x` for every `1 <= i <= d/2`.
pub fn is_irreducible(poly: u64) -> bool {
    if poly < 2 {
        return false;
    }
    let d = degree(poly as u128);
    if d == 1 {
        return true;
    }
    if poly & 1 == 0 {
        return false;
    }
    let mut power = 0b10; // x
    for _ in 0..d / 2 {
        power = mul_mod(power, power, poly);
        if poly_gcd(poly, power ^ 0b10) != 1 {
            return false;
        }
    }
    true
}

/// First irreducible polynomial of exact degree `degree` with a constant
/// term, in increasing numeric order.
pub fn smallest_irreducible(degree: u32) -> Option<u64> {
    if !(1..=MAX_DEGREE).contains(&degree) {
        return None;
    }
    let lead = 1u64 << degree;
    (lead..lead << 1)
        .step_by(2)
        .map(|candidate| candidate | 1)
        .find(|&candidate| is_irreducible(candidate))
}

/// Modulus used when none is configured.
pub fn default_modulus(degree: u32) -> AlgebraResult<u64> {
    check_degree(degree)?;
    match degree {
        16 => Ok(GF16_MODULUS),
        32 => Ok(GF32_MODULUS),
        _ => smallest_irreducible(degree)
            .ok_or_else(|| AlgebraError::invalid_modulus(0, degree, "no irreducible polynomial")),
    }
}

pub(crate) fn check_degree(degree: u32) -> AlgebraResult<()> {
    if (MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
        Ok(())
    } else {
        Err(AlgebraError::InvalidDegree {
            degree,
            min: MIN_DEGREE,
            max: MAX_DEGREE,
        })
    }
}

/// Check that `modulus` can define GF(2^degree).
pub fn validate_modulus(degree: u32, modulus: u64) -> AlgebraResult<()> {
    check_degree(degree)?;
    if modulus >> degree != 1 {
        return Err(AlgebraError::invalid_modulus(
            modulus,
            degree,
            format!("leading term must be x^{degree}"),
        ));
    }
    if modulus & 1 == 0 {
        return Err(AlgebraError::invalid_modulus(
            modulus,
            degree,
            "constant term must be 1",
        ));
    }
    if !is_irreducible(modulus) {
        return Err(AlgebraError::ReducibleModulus { modulus });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_irreducibles() {
        assert!(is_irreducible(0b111)); // x^2 + x + 1
        assert!(is_irreducible(0b1011)); // x^3 + x + 1
        assert!(is_irreducible(0x11B)); // AES polynomial
        assert!(is_irreducible(GF16_MODULUS));
        assert!(is_irreducible(GF32_MODULUS));
    }

    #[test]
    fn test_known_reducibles() {
        assert!(!is_irreducible(0b101)); // (x + 1)^2
        assert!(!is_irreducible(0b1111)); // (x + 1)(x^2 + x + 1)
        assert!(!is_irreducible(0b10010)); // divisible by x
        assert!(!is_irreducible(0x1_0001)); // (x + 1)^16
    }

    #[test]
    fn test_irreducible_count_degree_4() {
        // There are exactly three irreducible quartics over GF(2).
        let count = (0x10..0x20u64).filter(|&p| is_irreducible(p)).count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_smallest_irreducible() {
        assert_eq!(smallest_irreducible(3), Some(0b1011));
        assert_eq!(smallest_irreducible(4), Some(0b10011));
        assert_eq!(smallest_irreducible(8), Some(0x11B));
        for degree in MIN_DEGREE..=MAX_DEGREE {
            let poly = smallest_irreducible(degree).unwrap();
            assert_eq!(poly >> degree, 1);
            assert!(validate_modulus(degree, poly).is_ok());
        }
    }

    #[test]
    fn test_default_modulus() {
        assert_eq!(default_modulus(16).unwrap(), GF16_MODULUS);
        assert_eq!(default_modulus(32).unwrap(), GF32_MODULUS);
        assert_eq!(default_modulus(8).unwrap(), 0x11B);
        assert!(matches!(
            default_modulus(2),
            Err(AlgebraError::InvalidDegree { degree: 2, .. })
        ));
        assert!(default_modulus(33).is_err());
    }

    #[test]
    fn test_validate_modulus_rejects() {
        assert!(matches!(
            validate_modulus(16, GF32_MODULUS),
            Err(AlgebraError::InvalidModulus { .. })
        ));
        assert!(matches!(
            validate_modulus(16, 0x1_002C),
            Err(AlgebraError::InvalidModulus { .. })
        ));
        assert!(matches!(
            validate_modulus(16, 0x1_0001),
            Err(AlgebraError::ReducibleModulus { .. })
        ));
    }
}
