// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use evencycle_solver::{format_adjacency, generate, Adjacency};
use tracing::info;

use crate::helpers::rng;

#[derive(Subcommand, Debug)]
pub enum GenerateCommands {
    /// Directed cycle on `vertices` vertices
    Cycle {
        vertices: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Complete digraph on `vertices` vertices
    Complete {
        vertices: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// `edges` directed edges chosen uniformly at random
    ErdosRenyi {
        vertices: usize,
        edges: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Every vertex with in- and out-degree `degree`
    ConfigModel {
        vertices: usize,
        degree: usize,
        /// Allow repeated edges between the same pair
        #[arg(long)]
        allow_parallel: bool,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn execute(command: GenerateCommands) -> Result<()> {
    let (adjacency, out): (Adjacency, Option<PathBuf>) = match command {
        GenerateCommands::Cycle { vertices, out } => (generate::cycle(vertices), out),
        GenerateCommands::Complete { vertices, out } => (generate::complete(vertices), out),
        GenerateCommands::ErdosRenyi {
            vertices,
            edges,
            seed,
            out,
        } => (generate::erdos_renyi(vertices, edges, &mut rng(seed))?, out),
        GenerateCommands::ConfigModel {
            vertices,
            degree,
            allow_parallel,
            seed,
            out,
        } => (
            generate::configuration_model(vertices, degree, allow_parallel, &mut rng(seed))?,
            out,
        ),
    };

    let text = format_adjacency(&adjacency);
    match out {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("Could not write graph to {}", path.display()))?;
            info!(path = %path.display(), vertices = adjacency.len(), "wrote graph");
        }
        None => print!("{text}"),
    }
    Ok(())
}
