// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use evencycle_algebra::AlgebraError;
use thiserror::Error;

/// Errors from reading, validating or generating graphs.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Edge endpoint that is not a vertex of the graph
    #[error("Edge {from} -> {to} points outside the {vertices} vertices of the graph")]
    VertexOutOfRange {
        from: usize,
        to: usize,
        vertices: usize,
    },

    /// Malformed adjacency line
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// More edges requested than the graph can hold
    #[error("Requested {requested} edges but only {available} are possible")]
    TooManyEdges { requested: usize, available: usize },

    /// Rejection sampling never produced an acceptable graph
    #[error("No acceptable graph found after {attempts} attempts")]
    GenerationFailed { attempts: usize },
}

/// Errors from the algebraic solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type GraphResult<T> = Result<T, GraphError>;
pub type SolverResult<T> = Result<T, SolverError>;
