//! Puzzle data model: cells, operators, cages, boards, and the external
//! cage format used by frontends.
//!
//! Cages use 1-indexed (row, col) members internally; the external format
//! in [`ExternalCage`] is 0-indexed with the `=` operator spelled out.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Absolute tolerance for cage satisfaction. Division makes the fold
/// non-integral, so satisfaction is a float comparison even for `+`/`*`.
pub(crate) const SATISFY_EPS: f64 = 1e-4;

/// A grid cell, 1-indexed (row, col). Serialized as a 2-tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(u8, u8)", from = "(u8, u8)")]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbor: differs by exactly 1 in exactly one coordinate.
    pub fn adjacent(&self, other: &Cell) -> bool {
        let dr = self.row as i16 - other.row as i16;
        let dc = self.col as i16 - other.col as i16;
        (dr == 0 && dc.abs() == 1) || (dc == 0 && dr.abs() == 1)
    }

    /// Shares exactly one of row/column with `other` (row XOR col).
    ///
    /// Two cells that cross may never hold the same value; a cell does not
    /// cross itself, nor a cell in a different row and column.
    pub fn crosses(&self, other: &Cell) -> bool {
        (self.row == other.row) != (self.col == other.col)
    }
}

impl From<Cell> for (u8, u8) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl From<(u8, u8)> for Cell {
    fn from((row, col): (u8, u8)) -> Self {
        Self { row, col }
    }
}

/// Cage arithmetic operator.
///
/// `=` marks a single-cell cage whose value is fixed. Older puzzle payloads
/// spell it `.`; deserialization accepts both, serialization always emits `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "=", alias = ".")]
    Equal,
}

impl Operator {
    /// The display symbol (`=` for equality, never the legacy `.`).
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Equal => '=',
        }
    }

    /// Parse a symbol, accepting the legacy `.` equality token.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '=' | '.' => Some(Operator::Equal),
            _ => None,
        }
    }

    /// One step of a left fold. `Equal` keeps the left operand, so folding
    /// a single-cell cage yields its value unchanged.
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
            Operator::Equal => a,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cage: a non-empty group of cells with one arithmetic constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cage {
    /// Member cells, 1-indexed, in the order values are assigned to them.
    pub members: Vec<Cell>,
    pub operator: Operator,
    pub target: i64,
}

impl Cage {
    pub fn new(members: Vec<Cell>, operator: Operator, target: i64) -> Self {
        Self {
            members,
            operator,
            target,
        }
    }

    /// Whether some ordering of `values` folds to the target.
    ///
    /// Tries every permutation, left-folding the operator, and accepts a
    /// result within [`SATISFY_EPS`] of the target. The tolerance applies to
    /// every operator, not just division.
    pub fn satisfiable_by(&self, values: &[u8]) -> bool {
        if values.is_empty() {
            return false;
        }
        values
            .iter()
            .copied()
            .permutations(values.len())
            .any(|perm| {
                let folded = perm[1..]
                    .iter()
                    .fold(perm[0] as f64, |acc, &v| self.operator.apply(acc, v as f64));
                (folded - self.target as f64).abs() < SATISFY_EPS
            })
    }

    /// Convert to the external 0-indexed representation.
    pub fn to_external(&self) -> ExternalCage {
        ExternalCage {
            cells: self
                .members
                .iter()
                .map(|c| (c.row - 1, c.col - 1))
                .collect(),
            operator: self.operator,
            target: self.target,
        }
    }

    /// Convert from the external 0-indexed representation.
    pub fn from_external(cage: &ExternalCage) -> Self {
        Self {
            members: cage
                .cells
                .iter()
                .map(|&(r, c)| Cell::new(r.saturating_add(1), c.saturating_add(1)))
                .collect(),
            operator: cage.operator,
            target: cage.target,
        }
    }
}

/// The cage representation consumed by frontends: 0-indexed cells and the
/// equality operator normalized to `=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCage {
    pub cells: Vec<(u8, u8)>,
    pub operator: Operator,
    pub target: i64,
}

/// A puzzle: the grid size plus its cage partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub size: usize,
    pub cages: Vec<Cage>,
}

impl Puzzle {
    pub fn new(size: usize, cages: Vec<Cage>) -> Self {
        Self { size, cages }
    }

    /// All cages in the external 0-indexed format.
    pub fn to_external(&self) -> Vec<ExternalCage> {
        self.cages.iter().map(Cage::to_external).collect()
    }

    /// Rebuild a puzzle from externally supplied cages.
    pub fn from_external(size: usize, cages: &[ExternalCage]) -> Self {
        Self {
            size,
            cages: cages.iter().map(Cage::from_external).collect(),
        }
    }
}

/// An N×N board of values 1..=N, with 0 marking an empty cell in partially
/// filled boards. Serialized as row-major `Vec<Vec<u8>>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u8>>", try_from = "Vec<Vec<u8>>")]
pub struct Board {
    size: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Create an empty (all-zero) board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at 0-indexed (row, col).
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    /// Set the value at 0-indexed (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * self.size + col] = value;
    }

    /// Whether every row and column holds each of 1..=size exactly once.
    pub fn is_latin(&self) -> bool {
        let full: u16 = if self.size == 0 {
            0
        } else {
            ((1u32 << self.size) - 1) as u16
        };
        for i in 0..self.size {
            let mut row_mask: u16 = 0;
            let mut col_mask: u16 = 0;
            for j in 0..self.size {
                let rv = self.get(i, j);
                let cv = self.get(j, i);
                if rv == 0 || rv as usize > self.size || cv == 0 || cv as usize > self.size {
                    return false;
                }
                row_mask |= 1 << (rv - 1);
                col_mask |= 1 << (cv - 1);
            }
            if row_mask != full || col_mask != full {
                return false;
            }
        }
        true
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .chunks(board.size.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = String;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    size
                ));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { size, cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.get(row, col) {
                    0 => write!(f, ".")?,
                    v => write!(f, "{}", v)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_adjacency() {
        let c = Cell::new(2, 2);
        assert!(c.adjacent(&Cell::new(1, 2)));
        assert!(c.adjacent(&Cell::new(2, 3)));
        assert!(!c.adjacent(&Cell::new(3, 3)));
        assert!(!c.adjacent(&Cell::new(2, 2)));
        assert!(!c.adjacent(&Cell::new(2, 4)));
    }

    #[test]
    fn cell_crossing() {
        let c = Cell::new(2, 2);
        assert!(c.crosses(&Cell::new(2, 5)));
        assert!(c.crosses(&Cell::new(4, 2)));
        assert!(!c.crosses(&Cell::new(2, 2)));
        assert!(!c.crosses(&Cell::new(3, 4)));
    }

    #[test]
    fn operator_symbols_round_trip() {
        for op in [
            Operator::Add,
            Operator::Sub,
            Operator::Mul,
            Operator::Div,
            Operator::Equal,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        // legacy equality token normalizes to `=`
        assert_eq!(Operator::from_symbol('.'), Some(Operator::Equal));
        assert_eq!(Operator::from_symbol('?'), None);
    }

    #[test]
    fn operator_serde_accepts_legacy_dot() {
        let op: Operator = serde_json::from_str("\".\"").unwrap();
        assert_eq!(op, Operator::Equal);
        assert_eq!(serde_json::to_string(&op).unwrap(), "\"=\"");
    }

    #[test]
    fn satisfiable_subtraction_needs_some_ordering() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(1, 2)],
            Operator::Sub,
            2,
        );
        // 1 - 3 = -2 fails, but the permutation 3 - 1 = 2 succeeds
        assert!(cage.satisfiable_by(&[1, 3]));
        assert!(!cage.satisfiable_by(&[1, 2]));
    }

    #[test]
    fn satisfiable_division_tolerance() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(2, 1)],
            Operator::Div,
            2,
        );
        assert!(cage.satisfiable_by(&[4, 2]));
        assert!(cage.satisfiable_by(&[2, 4]));
        // 3/2 = 1.5 and 2/3 = 0.66 are both outside the tolerance
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(2, 1)],
            Operator::Div,
            1,
        );
        assert!(!cage.satisfiable_by(&[3, 2]));
        assert!(cage.satisfiable_by(&[2, 2]));
    }

    #[test]
    fn satisfiable_equality_is_a_single_value() {
        let cage = Cage::new(vec![Cell::new(3, 3)], Operator::Equal, 4);
        assert!(cage.satisfiable_by(&[4]));
        assert!(!cage.satisfiable_by(&[3]));
    }

    #[test]
    fn external_round_trip_preserves_geometry() {
        let cage = Cage::new(
            vec![Cell::new(1, 1), Cell::new(1, 2), Cell::new(2, 2)],
            Operator::Mul,
            12,
        );
        let external = cage.to_external();
        assert_eq!(external.cells, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(Cage::from_external(&external), cage);
    }

    #[test]
    fn external_json_shape() {
        let cage = Cage::new(vec![Cell::new(2, 3)], Operator::Equal, 1);
        let json = serde_json::to_string(&cage.to_external()).unwrap();
        assert_eq!(json, r#"{"cells":[[1,2]],"operator":"=","target":1}"#);
    }

    #[test]
    fn board_serde_round_trip() {
        let mut board = Board::new(2);
        board.set(0, 0, 1);
        board.set(0, 1, 2);
        board.set(1, 0, 2);
        board.set(1, 1, 1);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[[1,2],[2,1]]");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn ragged_board_rejected() {
        let result: Result<Board, _> = serde_json::from_str("[[1,2],[3]]");
        assert!(result.is_err());
    }

    #[test]
    fn latin_check() {
        let good: Board = serde_json::from_str("[[1,2,3],[2,3,1],[3,1,2]]").unwrap();
        assert!(good.is_latin());
        let dup: Board = serde_json::from_str("[[1,2,3],[2,3,1],[3,2,1]]").unwrap();
        assert!(!dup.is_latin());
        let partial: Board = serde_json::from_str("[[1,2,3],[2,3,1],[3,1,0]]").unwrap();
        assert!(!partial.is_latin());
    }
}
