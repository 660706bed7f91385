use std::fmt;

use serde::{Deserialize, Serialize};

use super::Player;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of aligned discs needed to win.
pub const CONNECT: usize = 4;

/// Line directions as (row delta, col delta). Each is scanned together with
/// its opposite, so four cover all eight neighbours.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Occupied(Player),
}

/// The cell most recently filled and by whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub player: Player,
}

/// A 6x7 grid. Row 0 is the top, row 5 is the bottom.
///
/// Boards are plain values: [`Board::drop_in_column`] returns a new board and
/// leaves the receiver untouched, so snapshots kept in a history stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a piece in a column. Returns the new board and the row where the
    /// piece landed.
    pub fn drop_in_column(&self, col: usize, player: Player) -> Result<(Board, usize), MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }

        // Lowest empty row in this column
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull)?;

        let mut next = *self;
        next.cells[row][col] = Cell::Occupied(player);
        Ok((next, row))
    }

    /// Check whether `last` completed four in a row.
    ///
    /// Only lines through the last placed cell are scanned; a win can only be
    /// created by the disc just dropped.
    pub fn check_win(&self, last: Move) -> Option<Player> {
        if last.row >= ROWS || last.col >= COLS {
            return None;
        }
        if self.cells[last.row][last.col] != Cell::Occupied(last.player) {
            return None;
        }

        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| {
                let count = 1
                    + self.run_length(last.row, last.col, dr, dc, last.player)
                    + self.run_length(last.row, last.col, -dr, -dc, last.player);
                count >= CONNECT
            })
            .then_some(last.player)
    }

    /// Count consecutive `player` discs starting one step away from
    /// (row, col) in direction (dr, dc).
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && r < ROWS as isize
            && c >= 0
            && c < COLS as isize
            && self.cells[r as usize][c as usize] == Cell::Occupied(player)
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Columns that still have room, ascending
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Number of discs on the board
    pub fn disc_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Check the gravity invariant: no empty cell below an occupied one in
    /// any column. Used to reject boards restored from storage.
    pub fn is_consistent(&self) -> bool {
        (0..COLS).all(|col| {
            (1..ROWS).all(|row| {
                self.cells[row - 1][col] == Cell::Empty || self.cells[row][col] != Cell::Empty
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(player) => player.symbol(),
                };
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
