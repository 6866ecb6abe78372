//! Puzzle generator: randomized Latin square construction and cage
//! partitioning.
//!
//! Every random draw goes through [`SeededRng`], so a fixed seed yields a
//! byte-identical puzzle. The draw schedule (row shuffles, the ordered-pair
//! column-swap loop, cage sizes, growth choices, operator picks) is part of
//! the seed contract; reordering or deduplicating any of it changes every
//! seeded puzzle in circulation.

use log::debug;

use crate::puzzle::{Cage, Cell, Operator, Puzzle};
use crate::rng::SeededRng;

/// Generate a puzzle of the given size, seeded when `seed` is supplied.
///
/// Callers are expected to pass sizes in 3..=9; this is not enforced here.
pub fn generate(size: usize, seed: Option<&str>) -> Puzzle {
    let mut generator = match seed {
        Some(seed) => Generator::from_seed(seed),
        None => Generator::from_clock(),
    };
    generator.generate(size)
}

/// Puzzle generator holding the seeded random state.
pub struct Generator {
    rng: SeededRng,
}

impl Generator {
    /// Create a generator with a fixed seed for reproducible puzzles.
    pub fn from_seed(seed: &str) -> Self {
        Self {
            rng: SeededRng::from_seed(seed),
        }
    }

    /// Create a generator seeded from the current time.
    pub fn from_clock() -> Self {
        Self {
            rng: SeededRng::from_clock(),
        }
    }

    /// Build a randomized Latin square, partition it into cages, and derive
    /// each cage's operator and target from the square's known values.
    ///
    /// Always returns a complete partition; a cage may come out smaller than
    /// its drawn size when it runs out of adjacent uncaged cells.
    pub fn generate(&mut self, size: usize) -> Puzzle {
        // Base Latin square: entry (j, i) = ((i + j) mod size) + 1.
        let mut square: Vec<Vec<u8>> = (0..size)
            .map(|j| (0..size).map(|i| (((i + j) % size) + 1) as u8).collect())
            .collect();

        // Whole-row shuffles, then coin-flip column swaps over every ordered
        // pair of columns. Self-pairs and repeated pairs are intentional:
        // each pair costs exactly one draw either way.
        for _ in 0..size {
            square = self.rng.shuffled(&square);
        }
        for c1 in 0..size {
            for c2 in 0..size {
                if self.rng.next() > 0.5 {
                    for row in square.iter_mut() {
                        row.swap(c1, c2);
                    }
                }
            }
        }

        // The square is indexed (col, row) relative to the solver's (row,
        // col) members; the solved board comes out transposed, which is
        // still the same puzzle.
        let value_at =
            |cell: &Cell| square[(cell.col - 1) as usize][(cell.row - 1) as usize] as i64;

        let mut uncaged: Vec<Cell> = Vec::with_capacity(size * size);
        for i in 1..=size {
            for j in 1..=size {
                uncaged.push(Cell::new(j as u8, i as u8));
            }
        }
        uncaged.sort_by_key(|c| (c.col, c.row));

        let mut cages: Vec<Cage> = Vec::new();
        while !uncaged.is_empty() {
            let want = self.rng.randint(1, 4);
            let mut cell = uncaged.remove(0);
            let mut members = vec![cell];

            // Grow from the most recently added cell only.
            for _ in 1..want {
                let adjacent: Vec<Cell> = uncaged
                    .iter()
                    .copied()
                    .filter(|other| cell.adjacent(other))
                    .collect();
                if adjacent.is_empty() {
                    break;
                }
                cell = *self.rng.choice(&adjacent);
                uncaged.retain(|c| *c != cell);
                members.push(cell);
            }

            cages.push(self.finish_cage(members, &value_at));
        }

        debug!(
            "partitioned {size}x{size} board into {} cages",
            cages.len()
        );
        Puzzle::new(size, cages)
    }

    /// Derive a cage's operator and target from the square's values.
    fn finish_cage(&mut self, members: Vec<Cell>, value_at: &dyn Fn(&Cell) -> i64) -> Cage {
        match members.len() {
            1 => {
                let target = value_at(&members[0]);
                Cage::new(members, Operator::Equal, target)
            }
            2 => {
                let v1 = value_at(&members[0]);
                let v2 = value_at(&members[1]);
                if v1 % v2 == 0 {
                    Cage::new(members, Operator::Div, v1 / v2)
                } else {
                    Cage::new(members, Operator::Sub, (v1 - v2).abs())
                }
            }
            _ => {
                let operator = *self.rng.choice(&[Operator::Add, Operator::Mul]);
                let values = members.iter().map(value_at);
                let target = match operator {
                    Operator::Add => values.sum(),
                    _ => values.product(),
                };
                Cage::new(members, operator, target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fixed_seed_is_deterministic() {
        let a = generate(4, Some("seed-A"));
        let b = generate(4, Some("seed-A"));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(4, Some("seed-A"));
        let b = generate(4, Some("seed-B"));
        assert_ne!(a, b);
    }

    #[test]
    fn cages_partition_the_grid() {
        for size in 3..=6 {
            let puzzle = generate(size, Some("partition"));
            let mut seen = HashSet::new();
            for cage in &puzzle.cages {
                assert!(!cage.members.is_empty());
                assert!(cage.members.len() <= 4);
                for cell in &cage.members {
                    assert!((1..=size as u8).contains(&cell.row));
                    assert!((1..=size as u8).contains(&cell.col));
                    assert!(seen.insert(*cell), "cell {:?} caged twice", cell);
                }
            }
            assert_eq!(seen.len(), size * size);
        }
    }

    #[test]
    fn cage_members_are_connected() {
        let puzzle = generate(6, Some("connected"));
        for cage in &puzzle.cages {
            // growth always extends from the previous cell
            for pair in cage.members.windows(2) {
                assert!(pair[0].adjacent(&pair[1]));
            }
        }
    }

    #[test]
    fn operators_match_cage_sizes() {
        let puzzle = generate(6, Some("operators"));
        for cage in &puzzle.cages {
            match cage.members.len() {
                1 => assert_eq!(cage.operator, Operator::Equal),
                2 => assert!(matches!(
                    cage.operator,
                    Operator::Sub | Operator::Div
                )),
                _ => assert!(matches!(
                    cage.operator,
                    Operator::Add | Operator::Mul
                )),
            }
            assert!(cage.target >= 0);
        }
    }

    #[test]
    fn single_cell_targets_are_board_values() {
        let puzzle = generate(5, Some("singles"));
        for cage in &puzzle.cages {
            if cage.operator == Operator::Equal {
                assert!((1..=5).contains(&cage.target));
            }
        }
    }
}
