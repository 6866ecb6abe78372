//! KenKen puzzle generation and constraint-satisfaction solving.
//!
//! A puzzle is an N×N Latin square partitioned into cages, each carrying an
//! arithmetic operator and target. [`generate`] builds a puzzle from a seed
//! (same seed, same puzzle — that is what makes daily puzzles possible),
//! [`solve`] runs a backtracking search over cages as variables, and
//! [`validate_board`] re-checks a filled board against the rules.
//!
//! Cage members are 1-indexed (row, col) internally; frontends consume the
//! 0-indexed [`ExternalCage`] format produced by [`Puzzle::to_external`].

mod generator;
mod puzzle;
mod rng;
mod solver;
mod validate;

pub use generator::{generate, Generator};
pub use puzzle::{Board, Cage, Cell, ExternalCage, Operator, Puzzle};
pub use rng::SeededRng;
pub use solver::{build_domains, build_neighbors, solve, Solution, Solver, SolverConfig};
pub use validate::{validate_board, CellIssue, Validation};
