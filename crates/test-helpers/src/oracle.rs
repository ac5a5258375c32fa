// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Exponential-time reference values by the Leibniz formula.

use evencycle_algebra::Algebra;
use evencycle_matrix::Matrix;

/// Calls `visit(perm, odd)` for every permutation of `0..n`, generated by
/// Heap's algorithm. Consecutive permutations differ by one transposition,
/// so the sign alternates.
pub fn for_each_permutation(n: usize, mut visit: impl FnMut(&[usize], bool)) {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    let mut odd = false;
    visit(&perm, odd);
    let mut i = 1;
    while i < n {
        if counters[i] < i {
            let j = if i % 2 == 0 { 0 } else { counters[i] };
            perm.swap(j, i);
            odd = !odd;
            visit(&perm, odd);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

fn product<A: Algebra>(algebra: &A, m: &Matrix<A::Element>, perm: &[usize]) -> A::Element {
    perm.iter()
        .enumerate()
        .fold(algebra.one(), |acc, (row, &col)| algebra.mul(acc, m[(row, col)]))
}

pub fn leibniz_determinant<A: Algebra>(algebra: &A, m: &Matrix<A::Element>) -> A::Element {
    let mut acc = algebra.zero();
    for_each_permutation(m.n(), |perm, odd| {
        let term = product(algebra, m, perm);
        acc = if odd {
            algebra.sub(acc, term)
        } else {
            algebra.add(acc, term)
        };
    });
    acc
}

pub fn leibniz_permanent<A: Algebra>(algebra: &A, m: &Matrix<A::Element>) -> A::Element {
    let mut acc = algebra.zero();
    for_each_permutation(m.n(), |perm, _| {
        acc = algebra.add(acc, product(algebra, m, perm));
    });
    acc
}

pub fn leibniz_per_minus_det<A: Algebra>(algebra: &A, m: &Matrix<A::Element>) -> A::Element {
    algebra.sub(leibniz_permanent(algebra, m), leibniz_determinant(algebra, m))
}
