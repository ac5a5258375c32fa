// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use evencycle_algebra::{Galois, GF16_MODULUS};
use evencycle_matrix::Elimination;
use evencycle_solver::{generate, shortest_even_cycle_brute, Graph, Solver};
use evencycle_test_helpers::{disjoint_cycles, random_digraph, seeded_rng};
use proptest::prelude::*;
use tracing_test::traced_test;

fn solve(
    galois: &Galois,
    adjacency: Vec<Vec<usize>>,
    seed: u64,
    elimination: Elimination,
) -> Option<u32> {
    let mut rng = seeded_rng(seed);
    let graph = Graph::sample(adjacency, galois.field(), &mut rng).unwrap();
    Solver::with_elimination(galois, elimination)
        .shortest_even_cycle(&graph, &mut rng)
        .unwrap()
}

#[test]
fn test_single_edge_with_self_loops_has_no_even_cycle() {
    let galois = Galois::new(16, GF16_MODULUS).unwrap();
    let adjacency = vec![vec![1], vec![]];
    assert_eq!(shortest_even_cycle_brute(&adjacency), None);
    for seed in 0..4 {
        assert_eq!(solve(&galois, adjacency.clone(), seed, Elimination::Scalar), None);
    }
}

#[test]
fn test_families_match_known_lengths() {
    let galois = Galois::standard(32).unwrap();
    let cases: Vec<(Vec<Vec<usize>>, Option<u32>)> = vec![
        (generate::cycle(2), Some(2)),
        (generate::cycle(6), Some(6)),
        (generate::cycle(7), None),
        (generate::complete(4), Some(2)),
        (disjoint_cycles(&[3, 5, 4]), Some(4)),
        (disjoint_cycles(&[3, 6, 8]), Some(6)),
        (disjoint_cycles(&[1, 3, 5]), None),
    ];
    for (i, (adjacency, expected)) in cases.into_iter().enumerate() {
        assert_eq!(shortest_even_cycle_brute(&adjacency), expected, "case {i}");
        assert_eq!(solve(&galois, adjacency, i as u64, Elimination::Scalar), expected, "case {i}");
    }
}

#[test]
fn test_random_digraphs_agree_with_brute_force() {
    let galois = Galois::standard(32).unwrap();
    let mut rng = seeded_rng(42);
    for trial in 0..40u64 {
        let n = 2 + (trial as usize % 6);
        let adjacency = random_digraph(n, 0.3, &mut rng);
        let expected = shortest_even_cycle_brute(&adjacency);
        let elimination = if trial % 2 == 0 {
            Elimination::Scalar
        } else {
            Elimination::Packed
        };
        assert_eq!(
            solve(&galois, adjacency.clone(), trial, elimination),
            expected,
            "trial {trial}: {adjacency:?}"
        );
    }
}

#[test]
fn test_oriented_undirected_graphs_agree() {
    let galois = Galois::standard(32).unwrap();
    let mut rng = seeded_rng(7);
    for trial in 0..10u64 {
        let undirected = generate::erdos_renyi(7, 12, &mut rng).unwrap();
        let directed = evencycle_solver::direct_undirected(&undirected, &mut rng);
        let expected = shortest_even_cycle_brute(&directed);
        assert_eq!(solve(&galois, directed, 100 + trial, Elimination::Scalar), expected);
    }
}

#[test]
#[traced_test]
fn test_solver_logs_result() {
    let galois = Galois::standard(16).unwrap();
    assert_eq!(solve(&galois, generate::cycle(4), 9, Elimination::Scalar), Some(4));
    assert!(logs_contain("shortest even cycle"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_disjoint_cycles_report_shortest_even_length(
        lengths in prop::collection::vec(1usize..7, 1..4),
        seed in any::<u64>(),
    ) {
        let expected = lengths.iter().copied().filter(|l| l % 2 == 0).min().map(|l| l as u32);
        let adjacency = disjoint_cycles(&lengths);
        prop_assert_eq!(shortest_even_cycle_brute(&adjacency), expected);
        let galois = Galois::standard(32).unwrap();
        prop_assert_eq!(solve(&galois, adjacency, seed, Elimination::Scalar), expected);
    }
}
