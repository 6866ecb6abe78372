//! Command-line interface for the KenKen engine.
//!
//! Speaks the same JSON shapes as the web API this engine backs: puzzles
//! travel as `{"size": N, "cages": [{"cells": [[r, c], ...], "operator",
//! "target"}]}` with 0-indexed cells, solutions as `number[][]` boards.

use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kenken_core::{
    generate, validate_board, Board, ExternalCage, Puzzle, Solver, SolverConfig,
};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "kenken", about = "Generate, solve, and validate KenKen puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a puzzle and its solution
    Generate {
        /// Grid size (3-9)
        #[arg(short, long, default_value_t = 4)]
        size: usize,
        /// Seed string; the same seed reproduces the same puzzle
        #[arg(long)]
        seed: Option<String>,
    },
    /// Solve a puzzle supplied as JSON
    Solve {
        /// Path to the puzzle JSON; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Abandon the search after this many assignments
        #[arg(long)]
        step_limit: Option<u64>,
    },
    /// Check a board against a puzzle, reporting per-cell issues
    Validate {
        /// Path to `{"puzzle": ..., "board": ...}` JSON; stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// The wire form of a puzzle: size plus 0-indexed cages.
#[derive(Serialize, Deserialize)]
struct PuzzleDoc {
    size: usize,
    cages: Vec<ExternalCage>,
}

#[derive(Serialize)]
struct GenerateResponse {
    puzzle: GeneratedPuzzle,
    stats: Stats,
}

#[derive(Serialize)]
struct GeneratedPuzzle {
    size: usize,
    cages: Vec<ExternalCage>,
    solution: Board,
}

#[derive(Serialize)]
struct SolveResponse {
    solution: Board,
    stats: Stats,
}

#[derive(Serialize)]
struct Stats {
    algorithm: &'static str,
    constraint_checks: u64,
    assignments: u64,
    completion_time: f64,
}

#[derive(Deserialize)]
struct ValidateRequest {
    puzzle: PuzzleDoc,
    board: Board,
}

// Chronological backtracking; reported as such.
const ALGORITHM: &str = "BT";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { size, seed } => {
            let puzzle = generate(size, seed.as_deref());
            info!("generated {}x{} puzzle with {} cages", size, size, puzzle.cages.len());
            let result = Solver::new()
                .solve(puzzle.size, &puzzle.cages)
                .ok_or("failed to solve generated puzzle")?;
            let response = GenerateResponse {
                puzzle: GeneratedPuzzle {
                    size: puzzle.size,
                    cages: puzzle.to_external(),
                    solution: result.solution,
                },
                stats: Stats {
                    algorithm: ALGORITHM,
                    constraint_checks: result.checks,
                    assignments: result.assigns,
                    completion_time: result.elapsed_seconds,
                },
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Solve { file, step_limit } => {
            let doc: PuzzleDoc = serde_json::from_str(&read_input(file)?)?;
            let puzzle = Puzzle::from_external(doc.size, &doc.cages);
            let solver = Solver::with_config(SolverConfig { step_limit });
            let result = solver
                .solve(puzzle.size, &puzzle.cages)
                .ok_or("puzzle has no solution")?;
            let response = SolveResponse {
                solution: result.solution,
                stats: Stats {
                    algorithm: ALGORITHM,
                    constraint_checks: result.checks,
                    assignments: result.assigns,
                    completion_time: result.elapsed_seconds,
                },
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Validate { file } => {
            let request: ValidateRequest = serde_json::from_str(&read_input(file)?)?;
            let puzzle = Puzzle::from_external(request.puzzle.size, &request.puzzle.cages);
            let report = validate_board(&puzzle, &request.board);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read_input(file: Option<PathBuf>) -> Result<String, Box<dyn Error>> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
