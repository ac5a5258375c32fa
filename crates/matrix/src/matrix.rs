// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Dense square matrices, row-major.
//!
//! Shape mismatches and out-of-range indices are programming errors and
//! panic.

use std::fmt;
use std::ops::{Index, IndexMut};

use evencycle_algebra::Algebra;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    n: usize,
    entries: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    /// `n x n` matrix with every entry set to `value`.
    pub fn filled(n: usize, value: T) -> Self {
        Self {
            n,
            entries: vec![value; n * n],
        }
    }

    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut entries = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                entries.push(f(row, col));
            }
        }
        Self { n, entries }
    }

    /// # Panics
    ///
    /// Panics if the rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let n = rows.len();
        let mut entries = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            assert_eq!(row.len(), n, "row {i} has {} entries, expected {n}", row.len());
            entries.extend(row);
        }
        Self { n, entries }
    }

    pub fn identity<A: Algebra<Element = T>>(algebra: &A, n: usize) -> Self {
        Self::from_fn(n, |r, c| if r == c { algebra.one() } else { algebra.zero() })
    }

    /// Side length.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self[(row, col)] = value;
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.entries[row * self.n..(row + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.entries.chunks(self.n.max(1)).take(self.n)
    }

    /// Overwrite every entry with `other`'s.
    ///
    /// # Panics
    ///
    /// Panics if the sizes differ.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.n, other.n, "matrix size mismatch");
        self.entries.copy_from_slice(&other.entries);
    }

    /// Swap rows `r1` and `r2` in columns `from_col..n`.
    pub fn swap_rows(&mut self, r1: usize, r2: usize, from_col: usize) {
        if r1 == r2 {
            return;
        }
        for col in from_col..self.n {
            self.entries.swap(r1 * self.n + col, r2 * self.n + col);
        }
    }

    /// Square submatrix of rows and columns `from..n`.
    pub fn trailing(&self, from: usize) -> Self {
        Self::from_fn(self.n - from, |r, c| self[(r + from, c + from)])
    }

    /// Entry-wise conversion.
    pub fn map<U: Copy>(&self, mut f: impl FnMut(T) -> U) -> Matrix<U> {
        Matrix {
            n: self.n,
            entries: self.entries.iter().map(|&e| f(e)).collect(),
        }
    }

    pub fn add<A: Algebra<Element = T>>(&self, algebra: &A, other: &Self) -> Self {
        self.zip_with(other, |a, b| algebra.add(a, b))
    }

    pub fn sub<A: Algebra<Element = T>>(&self, algebra: &A, other: &Self) -> Self {
        self.zip_with(other, |a, b| algebra.sub(a, b))
    }

    /// Naive `O(n^3)` product.
    pub fn mul<A: Algebra<Element = T>>(&self, algebra: &A, other: &Self) -> Self {
        assert_eq!(self.n, other.n, "matrix size mismatch");
        Self::from_fn(self.n, |r, c| {
            (0..self.n).fold(algebra.zero(), |acc, k| {
                algebra.add(acc, algebra.mul(self[(r, k)], other[(k, c)]))
            })
        })
    }

    /// Multiply row `row` by `v` in columns `from_col..n`.
    pub fn scale_row<A: Algebra<Element = T>>(
        &mut self,
        algebra: &A,
        row: usize,
        v: T,
        from_col: usize,
    ) {
        for col in from_col..self.n {
            let idx = row * self.n + col;
            self.entries[idx] = algebra.mul(self.entries[idx], v);
        }
    }

    /// `row(r2) -= v * row(r1)` in columns `from_col..n`.
    pub fn row_op<A: Algebra<Element = T>>(
        &mut self,
        algebra: &A,
        r1: usize,
        r2: usize,
        v: T,
        from_col: usize,
    ) {
        assert_ne!(r1, r2, "row operation needs two distinct rows");
        for col in from_col..self.n {
            let src = self.entries[r1 * self.n + col];
            let idx = r2 * self.n + col;
            self.entries[idx] = algebra.sub(self.entries[idx], algebra.mul(v, src));
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        assert_eq!(self.n, other.n, "matrix size mismatch");
        Self {
            n: self.n,
            entries: self
                .entries
                .iter()
                .zip(&other.entries)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.n && col < self.n,
            "index ({row}, {col}) out of range for size {}",
            self.n
        );
        &self.entries[row * self.n + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.n && col < self.n,
            "index ({row}, {col}) out of range for size {}",
            self.n
        );
        &mut self.entries[row * self.n + col]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.n {
            for col in 0..self.n {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.entries[row * self.n + col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("n", &self.n)
            .field("entries", &self.entries)
            .finish()
    }
}
