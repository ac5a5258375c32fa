// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::fmt::Debug;

/// A commutative ring with identity whose elements are small `Copy` values.
///
/// The arithmetic context is passed explicitly, so elements carry no
/// reference to the field or ring that produced them.
pub trait Algebra: Sync {
    type Element: Copy + Eq + Debug + Send + Sync;

    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    fn add(&self, a: Self::Element, b: Self::Element) -> Self::Element;
    fn sub(&self, a: Self::Element, b: Self::Element) -> Self::Element;
    fn neg(&self, a: Self::Element) -> Self::Element;
    fn mul(&self, a: Self::Element, b: Self::Element) -> Self::Element;
}
