// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Carryless (GF(2)[x]) multiplication.
//!
//! Operands are polynomials over GF(2) packed into machine words, bit `i`
//! holding the coefficient of `x^i`. Every product used by the field and
//! ring fits in 64 bits, so only the low half of the 128-bit carryless
//! product is ever needed.

/// Implementation used for carryless multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CarrylessBackend {
    /// Shift-and-xor loop, available everywhere.
    Portable,
    /// `PCLMULQDQ` on x86_64.
    Pclmulqdq,
}

impl CarrylessBackend {
    /// Pick the fastest backend supported by the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        if Self::Pclmulqdq.is_supported() {
            Self::Pclmulqdq
        } else {
            Self::Portable
        }
    }

    /// Whether this backend can run on the current CPU.
    #[must_use]
    pub fn is_supported(self) -> bool {
        match self {
            Self::Portable => true,
            #[cfg(target_arch = "x86_64")]
            Self::Pclmulqdq => std::is_x86_feature_detected!("pclmulqdq"),
            #[cfg(not(target_arch = "x86_64"))]
            Self::Pclmulqdq => false,
        }
    }

    /// Low 64 bits of the carryless product of `a` and `b`.
    #[inline]
    pub fn mul(self, a: u64, b: u64) -> u64 {
        match self {
            Self::Portable => clmul_portable(a, b),
            #[cfg(target_arch = "x86_64")]
            // SAFETY: a `Pclmulqdq` backend is only handed out after
            // `is_supported` confirmed the instruction is available.
            Self::Pclmulqdq => unsafe { clmul_pclmulqdq(a, b) },
            #[cfg(not(target_arch = "x86_64"))]
            Self::Pclmulqdq => clmul_portable(a, b),
        }
    }
}

impl Default for CarrylessBackend {
    fn default() -> Self {
        Self::detect()
    }
}

/// Low 64 bits of the carryless product, one shifted copy of `a` per set bit of `b`.
#[inline]
pub fn clmul_portable(a: u64, b: u64) -> u64 {
    let mut acc = 0u64;
    let mut rest = b;
    while rest != 0 {
        let i = rest.trailing_zeros();
        acc ^= a << i;
        rest &= rest - 1;
    }
    acc
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "pclmulqdq")]
unsafe fn clmul_pclmulqdq(a: u64, b: u64) -> u64 {
    use std::arch::x86_64::{_mm_clmulepi64_si128, _mm_cvtsi128_si64, _mm_set_epi64x};

    let product = _mm_clmulepi64_si128(_mm_set_epi64x(0, a as i64), _mm_set_epi64x(0, b as i64), 0);
    _mm_cvtsi128_si64(product) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_portable_small_products() {
        // (x + 1)^2 = x^2 + 1
        assert_eq!(clmul_portable(0b11, 0b11), 0b101);
        // (x^2 + x + 1)(x + 1) = x^3 + 1
        assert_eq!(clmul_portable(0b111, 0b11), 0b1001);
        assert_eq!(clmul_portable(0, 0xdead_beef), 0);
        assert_eq!(clmul_portable(1, 0xdead_beef), 0xdead_beef);
    }

    #[test]
    fn test_detect_is_supported() {
        assert!(CarrylessBackend::detect().is_supported());
        assert!(CarrylessBackend::Portable.is_supported());
    }

    proptest! {
        #[test]
        fn test_backends_agree(a in any::<u32>(), b in any::<u32>()) {
            let backend = CarrylessBackend::detect();
            prop_assert_eq!(backend.mul(a as u64, b as u64), clmul_portable(a as u64, b as u64));
        }

        #[test]
        fn test_clmul_commutes(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(clmul_portable(a as u64, b as u64), clmul_portable(b as u64, a as u64));
        }
    }
}
