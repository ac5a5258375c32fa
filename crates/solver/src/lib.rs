// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Shortest even cycle
//!
//! Randomized algebraic detection of the shortest directed even cycle,
//! with an exhaustive search to check it against, plus the graph input
//! format and generators for benchmark families.

mod errors;
pub mod generate;
mod graph;
mod solver;

pub use errors::*;
pub use graph::*;
pub use solver::*;
