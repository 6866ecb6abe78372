//! Constraint-satisfaction solver: per-cage domains, the cage conflict
//! graph, and chronological backtracking over cages as variables.
//!
//! The search binds cages in the order they were supplied and tries domain
//! tuples in enumeration order. It is plain chronological backtracking; no
//! forward checking and no minimum-remaining-values reordering.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::puzzle::{Board, Cage, Cell};

/// A solved board plus search statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub solution: Board,
    /// Pairwise neighbor consistency checks performed.
    pub checks: u64,
    /// Successful cage bindings, including ones later undone.
    pub assigns: u64,
    pub elapsed_seconds: f64,
}

/// Solver configuration.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Abandon the search after this many bindings. The reference search
    /// runs unbounded; the limit exists so callers facing adversarial
    /// input can cap worst-case blow-up on large grids. `None` preserves
    /// the unbounded behavior.
    pub step_limit: Option<u64>,
}

/// Backtracking solver over cages as variables.
pub struct Solver {
    config: SolverConfig,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a solver with default (unbounded) configuration.
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve a puzzle, returning `None` when no full assignment exists.
    ///
    /// An unsatisfiable puzzle is an expected outcome for externally
    /// supplied cages, not an error.
    pub fn solve(&self, size: usize, cages: &[Cage]) -> Option<Solution> {
        let start = Instant::now();
        let in_grid = cages.iter().flat_map(|c| &c.members).all(|m| {
            (1..=size).contains(&(m.row as usize)) && (1..=size).contains(&(m.col as usize))
        });
        if !in_grid {
            warn!("cage member outside the {size}x{size} grid; treating as unsolvable");
            return None;
        }

        let domains = build_domains(size, cages);
        let neighbors = build_neighbors(cages);
        debug!(
            "solving {size}x{size} puzzle: {} cages, {} candidate tuples",
            cages.len(),
            domains.iter().map(Vec::len).sum::<usize>()
        );

        let n = cages.len();
        let mut checks: u64 = 0;
        let mut assigns: u64 = 0;

        // Explicit-stack chronological backtracking. Cages 0..depth are
        // bound to domains[k][cursor[k]]; cursor[depth] scans candidates
        // for the next cage.
        let mut cursor = vec![0usize; n];
        let mut depth = 0usize;
        let solved = loop {
            if depth == n {
                break true;
            }
            let mut bound = false;
            while cursor[depth] < domains[depth].len() {
                let candidate = &domains[depth][cursor[depth]];
                if consistent(
                    cages, &domains, &neighbors, &cursor, depth, candidate, &mut checks,
                ) {
                    assigns += 1;
                    if let Some(limit) = self.config.step_limit {
                        if assigns > limit {
                            warn!("search abandoned after {assigns} assignments (limit {limit})");
                            return None;
                        }
                    }
                    depth += 1;
                    if depth < n {
                        cursor[depth] = 0;
                    }
                    bound = true;
                    break;
                }
                cursor[depth] += 1;
            }
            if !bound {
                if depth == 0 {
                    break false;
                }
                depth -= 1;
                cursor[depth] += 1;
            }
        };

        if !solved {
            debug!("search exhausted after {checks} checks, {assigns} assignments");
            return None;
        }

        let mut board = Board::new(size);
        for (k, cage) in cages.iter().enumerate() {
            let values = &domains[k][cursor[k]];
            for (cell, &value) in cage.members.iter().zip(values) {
                board.set(cell.row as usize - 1, cell.col as usize - 1, value);
            }
        }
        Some(Solution {
            solution: board,
            checks,
            assigns,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}

/// Solve with the default configuration.
pub fn solve(size: usize, cages: &[Cage]) -> Option<Solution> {
    Solver::new().solve(size, cages)
}

/// Whether binding `candidate` to cage `depth` collides with any bound
/// neighbor. Every comparison against a bound neighbor counts as one check.
#[allow(clippy::too_many_arguments)]
fn consistent(
    cages: &[Cage],
    domains: &[Vec<Vec<u8>>],
    neighbors: &[Vec<usize>],
    cursor: &[usize],
    depth: usize,
    candidate: &[u8],
    checks: &mut u64,
) -> bool {
    for &nb in &neighbors[depth] {
        if nb < depth {
            *checks += 1;
            if conflicting(
                &cages[depth].members,
                candidate,
                &cages[nb].members,
                &domains[nb][cursor[nb]],
            ) {
                return false;
            }
        }
    }
    true
}

/// Whether any pair of crossing cells across the two cages holds equal
/// values.
pub(crate) fn conflicting(
    a_members: &[Cell],
    a_values: &[u8],
    b_members: &[Cell],
    b_values: &[u8],
) -> bool {
    for (ca, va) in a_members.iter().zip(a_values) {
        for (cb, vb) in b_members.iter().zip(b_values) {
            if ca.crosses(cb) && va == vb {
                return true;
            }
        }
    }
    false
}

/// Enumerate each cage's admissible value tuples: the full Cartesian
/// product of 1..=size over its members, minus tuples with an internal
/// crossing conflict, minus tuples no permutation of which satisfies the
/// cage. Tuples stay in enumeration order.
pub fn build_domains(size: usize, cages: &[Cage]) -> Vec<Vec<Vec<u8>>> {
    cages
        .iter()
        .map(|cage| {
            itertools::repeat_n(1..=size as u8, cage.members.len())
                .multi_cartesian_product()
                .filter(|values| {
                    !conflicting(&cage.members, values, &cage.members, values)
                        && cage.satisfiable_by(values)
                })
                .collect()
        })
        .collect()
}

/// Build the symmetric cage conflict graph: two cages are neighbors iff
/// some member of one crosses some member of the other. Purely geometric;
/// no board values involved.
pub fn build_neighbors(cages: &[Cage]) -> Vec<Vec<usize>> {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); cages.len()];
    for (a, cage_a) in cages.iter().enumerate() {
        for (b, cage_b) in cages.iter().enumerate().skip(a + 1) {
            let interact = cage_a
                .members
                .iter()
                .any(|ca| cage_b.members.iter().any(|cb| ca.crosses(cb)));
            if interact {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
    }
    neighbors
}
