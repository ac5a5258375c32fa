// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::fs;

use evencycle_solver::{
    format_adjacency, generate, read_adjacency_file, shortest_even_cycle_brute, GraphError,
};
use evencycle_test_helpers::seeded_rng;
use tempfile::tempdir;

#[test]
fn test_generated_graph_round_trips_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cm8_2");
    let adjacency = generate::configuration_model(8, 2, false, &mut seeded_rng(1)).unwrap();
    fs::write(&path, format_adjacency(&adjacency)).unwrap();
    assert_eq!(read_adjacency_file(&path).unwrap(), adjacency);
}

#[test]
fn test_reads_commented_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("square");
    fs::write(&path, "# square\n1\n2\n# closing edge next\n3\n0\n").unwrap();
    let adjacency = read_adjacency_file(&path).unwrap();
    assert_eq!(adjacency.len(), 4);
    assert_eq!(shortest_even_cycle_brute(&adjacency), Some(4));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        read_adjacency_file(dir.path().join("absent")),
        Err(GraphError::Io(_))
    ));
}
