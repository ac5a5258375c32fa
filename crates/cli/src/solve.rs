// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use evencycle_algebra::Multiplier;
use evencycle_config::{load_config, CliOverrides};
use evencycle_matrix::Elimination;
use evencycle_solver::{
    direct_undirected, read_adjacency_file, shortest_even_cycle_brute, Graph, Solver,
};
use tracing::info;

use crate::helpers::{parse_modulus, parse_multiplier, rng};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Graph in the adjacency text format
    #[arg(long, short)]
    file: PathBuf,

    /// Use the exhaustive search instead of the algebraic solver
    #[arg(long)]
    pub brute: bool,

    /// Treat the file as undirected and orient every edge at random
    #[arg(long)]
    undirected: bool,

    /// Extension degree of the field
    #[arg(long)]
    degree: Option<u32>,

    /// Modulus polynomial as an integer bit pattern, decimal or 0x-prefixed
    #[arg(long, value_parser = parse_modulus)]
    modulus: Option<u64>,

    /// Ring multiplication strategy: reference, carryless or kronecker
    #[arg(long, value_parser = parse_multiplier)]
    multiplier: Option<Multiplier>,

    /// Evaluate sampled determinants lane-packed
    #[arg(long)]
    packed: bool,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for every random choice, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Report the time spent solving
    #[arg(long)]
    pub time: bool,
}

impl SolveArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            field_degree: self.degree,
            modulus: self.modulus,
            multiplier: self.multiplier,
            elimination: self.packed.then_some(Elimination::Packed),
            threads: self.threads,
            seed: self.seed,
        }
    }
}

pub fn execute(config_file: Option<PathBuf>, args: SolveArgs) -> Result<()> {
    let config = load_config(config_file, args.overrides())?;
    if let Some(threads) = config.threads() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Could not size the worker pool")?;
    }
    let mut rng = rng(config.seed());

    let mut adjacency = read_adjacency_file(&args.file)
        .with_context(|| format!("Could not read graph {}", args.file.display()))?;
    if args.undirected {
        adjacency = direct_undirected(&adjacency, &mut rng);
    }

    let started = Instant::now();
    let length = if args.brute {
        shortest_even_cycle_brute(&adjacency)
    } else {
        let galois = config.galois()?;
        let graph = Graph::sample(adjacency, galois.field(), &mut rng)?;
        Solver::with_elimination(&galois, config.elimination())
            .shortest_even_cycle(&graph, &mut rng)?
    };
    let elapsed = started.elapsed();
    info!(?length, ?elapsed, brute = args.brute, "solved");

    match length {
        Some(length) => println!("{length}"),
        None => println!("none"),
    }
    if args.time {
        println!("time: {:.3}s", elapsed.as_secs_f64());
    }
    Ok(())
}
