// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{instrument, Level};

use crate::generate::{self, GenerateCommands};
use crate::helpers::telemetry::setup_simple_tracing;
use crate::solve::{self, SolveArgs};

#[derive(Parser, Debug)]
#[command(name = "evencycle")]
#[command(about = "Find the shortest even cycle in a directed graph", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `evencycle -vvv` will give
    /// you trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());

        match self.command {
            Commands::Solve(args) => solve::execute(self.config, args)?,
            Commands::Generate { command } => generate::execute(command)?,
        }

        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the length of the shortest even cycle of a graph, or `none`
    Solve(SolveArgs),

    /// Write a graph of a benchmark family in the adjacency text format
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use evencycle_algebra::Multiplier;

    #[test]
    fn test_log_levels() {
        let cli = Cli::try_parse_from(["evencycle", "-vv", "solve", "--file", "g"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);
        let cli = Cli::try_parse_from(["evencycle", "solve", "-q", "--file", "g"]).unwrap();
        assert_eq!(cli.log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["evencycle", "-v", "-q", "solve", "--file", "g"]).is_err());
    }

    #[test]
    fn test_solve_flags() {
        let cli = Cli::try_parse_from([
            "evencycle",
            "--config",
            "solver.yaml",
            "solve",
            "--file",
            "graphs/k5",
            "--degree",
            "32",
            "--modulus",
            "0x10000008D",
            "--multiplier",
            "carryless",
            "--packed",
            "--seed",
            "5",
            "--time",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("solver.yaml")));
        let Commands::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.field_degree, Some(32));
        assert_eq!(overrides.modulus, Some(0x1_0000_008D));
        assert_eq!(overrides.multiplier, Some(Multiplier::Carryless));
        assert_eq!(
            overrides.elimination,
            Some(evencycle_matrix::Elimination::Packed)
        );
        assert_eq!(overrides.seed, Some(5));
        assert_eq!(overrides.threads, None);
        assert!(args.time && !args.brute);
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "evencycle",
            "generate",
            "config-model",
            "10",
            "3",
            "--allow-parallel",
            "--out",
            "cm10_3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Generate {
                command: GenerateCommands::ConfigModel {
                    vertices: 10,
                    degree: 3,
                    allow_parallel: true,
                    ..
                }
            }
        ));
        let args = ["evencycle", "solve", "--multiplier", "fast", "--file", "g"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
