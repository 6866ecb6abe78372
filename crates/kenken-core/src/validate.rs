//! Full-board validation: row/column duplicate detection and exact cage
//! evaluation on a (possibly partially) filled board.
//!
//! This deliberately duplicates the solver's satisfaction predicate in a
//! simpler form: it works on concrete board values with exact integer
//! arithmetic, and only judges a cage once all of its cells are filled.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::puzzle::{Board, Cage, Operator, Puzzle};

/// A single problem found on the board, located at a 0-indexed cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellIssue {
    pub row: usize,
    pub col: usize,
    pub message: String,
}

/// The outcome of validating a board against a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<CellIssue>,
}

/// Check a board against the Latin-square rule and the puzzle's cages.
///
/// Empty cells (value 0) are ignored: a duplicate is only reported between
/// two filled cells, and a cage is only evaluated once fully filled.
pub fn validate_board(puzzle: &Puzzle, board: &Board) -> Validation {
    let mut errors = Vec::new();
    let size = puzzle.size;
    if board.size() != size {
        return Validation {
            valid: false,
            errors: vec![CellIssue {
                row: 0,
                col: 0,
                message: format!(
                    "Board is {}x{}, puzzle expects {}x{}",
                    board.size(),
                    board.size(),
                    size,
                    size
                ),
            }],
        };
    }

    for row in 0..size {
        let mut seen = HashSet::new();
        for col in 0..size {
            let value = board.get(row, col);
            if value > 0 {
                if seen.contains(&value) {
                    errors.push(CellIssue {
                        row,
                        col,
                        message: format!("Duplicate {value} in row"),
                    });
                }
                seen.insert(value);
            }
        }
    }

    for col in 0..size {
        let mut seen = HashSet::new();
        for row in 0..size {
            let value = board.get(row, col);
            if value > 0 {
                if seen.contains(&value) {
                    errors.push(CellIssue {
                        row,
                        col,
                        message: format!("Duplicate {value} in column"),
                    });
                }
                seen.insert(value);
            }
        }
    }

    for cage in &puzzle.cages {
        // Out-of-grid members never read as filled, so such a cage is
        // simply never judged.
        let values: Vec<u8> = cage
            .members
            .iter()
            .filter(|c| (1..=size as u8).contains(&c.row) && (1..=size as u8).contains(&c.col))
            .map(|c| board.get(c.row as usize - 1, c.col as usize - 1))
            .filter(|&v| v > 0)
            .collect();
        if values.len() == cage.members.len() && !evaluate_cage(cage, &values) {
            for cell in &cage.members {
                errors.push(CellIssue {
                    row: cell.row as usize - 1,
                    col: cell.col as usize - 1,
                    message: "Cage constraint not satisfied".to_string(),
                });
            }
        }
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Exact evaluation of a fully filled cage.
///
/// `-` and `/` only apply to two-cell cages; `/` accepts the quotient in
/// either direction.
fn evaluate_cage(cage: &Cage, values: &[u8]) -> bool {
    let target = cage.target;
    match cage.operator {
        Operator::Equal => values.len() == 1 && values[0] as i64 == target,
        Operator::Add => values.iter().map(|&v| v as i64).sum::<i64>() == target,
        Operator::Mul => values.iter().map(|&v| v as i64).product::<i64>() == target,
        Operator::Sub => {
            values.len() == 2 && (values[0] as i64 - values[1] as i64).abs() == target
        }
        Operator::Div => {
            if values.len() != 2 {
                return false;
            }
            let (a, b) = (values[0] as i64, values[1] as i64);
            a == b * target || b == a * target
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::puzzle::Cell;
    use crate::solver::solve;

    #[test]
    fn solved_puzzle_validates() {
        let puzzle = generate(4, Some("validate"));
        let result = solve(puzzle.size, &puzzle.cages).unwrap();
        let report = validate_board(&puzzle, &result.solution);
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn empty_board_validates() {
        let puzzle = generate(4, Some("validate"));
        let report = validate_board(&puzzle, &Board::new(4));
        assert!(report.valid);
    }

    #[test]
    fn duplicate_in_row_is_reported() {
        let puzzle = Puzzle::new(3, vec![]);
        let mut board = Board::new(3);
        board.set(0, 0, 2);
        board.set(0, 2, 2);
        let report = validate_board(&puzzle, &board);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![CellIssue {
                row: 0,
                col: 2,
                message: "Duplicate 2 in row".to_string(),
            }]
        );
    }

    #[test]
    fn duplicate_in_column_is_reported() {
        let puzzle = Puzzle::new(3, vec![]);
        let mut board = Board::new(3);
        board.set(0, 1, 3);
        board.set(2, 1, 3);
        let report = validate_board(&puzzle, &board);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, "Duplicate 3 in column");
        assert_eq!(report.errors[0].row, 2);
    }

    #[test]
    fn unsatisfied_cage_flags_every_member() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(1, 2)],
            Operator::Add,
            5,
        );
        let puzzle = Puzzle::new(3, vec![cage]);
        let mut board = Board::new(3);
        board.set(0, 0, 1);
        board.set(0, 1, 2);
        let report = validate_board(&puzzle, &board);
        assert_eq!(report.errors.len(), 2);
        assert!(report
            .errors
            .iter()
            .all(|e| e.message == "Cage constraint not satisfied"));
    }

    #[test]
    fn partially_filled_cage_is_not_judged() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(1, 2)],
            Operator::Add,
            5,
        );
        let puzzle = Puzzle::new(3, vec![cage]);
        let mut board = Board::new(3);
        board.set(0, 0, 1);
        let report = validate_board(&puzzle, &board);
        assert!(report.valid);
    }

    #[test]
    fn division_accepts_either_direction() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(2, 1)],
            Operator::Div,
            2,
        );
        assert!(evaluate_cage(&cage, &[2, 4]));
        assert!(evaluate_cage(&cage, &[4, 2]));
        assert!(!evaluate_cage(&cage, &[3, 2]));
    }

    #[test]
    fn equality_cage_checks_the_fixed_value() {
        let cage = Cage::new(vec![Cell::new(2, 2)], Operator::Equal, 3);
        assert!(evaluate_cage(&cage, &[3]));
        assert!(!evaluate_cage(&cage, &[1]));
    }
}
