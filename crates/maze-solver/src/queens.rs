//! N-Queens backtracking solver.
//!
//! Queens are placed one per row, top to bottom, scanning columns left to
//! right. Every placement goes through a `QueenGuard` that lifts the queen
//! again when it is dropped, so the board is restored even if the
//! recursion unwinds.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// N x N occupancy board, row-major, 1 = queen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    n: usize,
    cells: Vec<u8>,
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn has_queen(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.n + col] == 1
    }

    pub fn queen_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Would a queen at `(row, col)` be attacked by one in an earlier row?
    ///
    /// Only rows above are scanned: the solver never has a queen in the
    /// current row or below when it asks.
    pub fn is_attack(&self, row: usize, col: usize) -> bool {
        if (0..row).any(|k| self.has_queen(k, col)) {
            return true;
        }
        // up-right diagonal
        if (1..=row)
            .map(|d| (row - d, col + d))
            .take_while(|&(_, c)| c < self.n)
            .any(|(r, c)| self.has_queen(r, c))
        {
            return true;
        }
        // up-left diagonal
        (1..=row.min(col)).any(|d| self.has_queen(row - d, col - d))
    }

    /// Put a queen on `(row, col)` for as long as the guard lives.
    pub fn place(&mut self, row: usize, col: usize) -> QueenGuard<'_> {
        self.cells[row * self.n + col] = 1;
        QueenGuard {
            board: self,
            row,
            col,
        }
    }
}

/// Holds one placed queen; removes it on drop.
pub struct QueenGuard<'a> {
    board: &'a mut Board,
    row: usize,
    col: usize,
}

impl Deref for QueenGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for QueenGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for QueenGuard<'_> {
    fn drop(&mut self) {
        let n = self.board.n;
        self.board.cells[self.row * n + self.col] = 0;
    }
}

/// A complete, attack-free placement. Independent of the board it was
/// copied from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    n: usize,
    cells: Vec<u8>,
}

impl Solution {
    fn snapshot(board: &Board) -> Self {
        Self {
            n: board.n,
            cells: board.cells.clone(),
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Occupancy matrix, one `Vec` per row
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.n).map(<[u8]>::to_vec).collect()
    }

    /// Column of the queen in each row
    pub fn columns(&self) -> Vec<usize> {
        self.cells
            .chunks(self.n)
            .filter_map(|row| row.iter().position(|&c| c == 1))
            .collect()
    }
}

impl fmt::Display for Solution {
    /// One row-vector per line, e.g. `[0, 1, 0, 0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.n) {
            writeln!(f, "{:?}", row)?;
        }
        Ok(())
    }
}

fn place_row(board: &mut Board, row: usize, remaining: usize, solutions: &mut Vec<Solution>) {
    if remaining == 0 {
        solutions.push(Solution::snapshot(board));
        return;
    }
    for col in 0..board.size() {
        if !board.is_attack(row, col) {
            let mut placed = board.place(row, col);
            place_row(&mut placed, row + 1, remaining - 1, solutions);
        }
    }
}

/// Every solution for an `n` x `n` board, in column-scan order.
pub fn solve(n: usize) -> Result<Vec<Solution>> {
    if n == 0 {
        return Err(Error::invalid("board size must be at least 1"));
    }
    let mut board = Board::new(n);
    let mut solutions = Vec::new();
    place_row(&mut board, 0, n, &mut solutions);
    tracing::debug!(n, count = solutions.len(), "n-queens search finished");
    Ok(solutions)
}

pub fn count_solutions(n: usize) -> Result<usize> {
    solve(n).map(|s| s.len())
}

/// Parse a board size typed by a user.
pub fn parse_board_size(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| Error::invalid(format!("board size must be an integer, got {:?}", trimmed)))?;
    if value < 1 {
        return Err(Error::invalid(format!(
            "board size must be at least 1, got {}",
            value
        )));
    }
    usize::try_from(value).map_err(|_| Error::invalid(format!("board size {} is too large", value)))
}
