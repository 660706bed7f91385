use serde::{Deserialize, Serialize};

use super::{Board, Move, Player};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Ongoing,
    Won(Player),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current: Player,
    result: GameResult,
    last_move: Option<Move>,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current: Player::First,
            result: GameResult::Ongoing,
            last_move: None,
        }
    }

    /// Player whose turn is next. Left on the final mover once the game ends.
    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.valid_columns()
    }

    /// Apply a move for the current player and return the new state
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current;
        let (board, row) = self.board.drop_in_column(column, player)?;
        let last_move = Move {
            row,
            col: column,
            player,
        };

        let result = match board.check_win(last_move) {
            Some(winner) => GameResult::Won(winner),
            None if board.is_full() => GameResult::Draw,
            None => GameResult::Ongoing,
        };

        // The turn pointer stays on the final mover once the game is over.
        let current = if result == GameResult::Ongoing {
            player.other()
        } else {
            player
        };

        Ok(GameState {
            board,
            current,
            result,
            last_move: Some(last_move),
        })
    }

    /// Structural validity of a state restored from outside the engine:
    /// gravity holds, a win is attributable to the last move, a draw has a
    /// full board, and only the initial board lacks a last move.
    pub fn is_well_formed(&self) -> bool {
        if !self.board.is_consistent() {
            return false;
        }
        match self.last_move {
            None => self.board == Board::new() && self.result == GameResult::Ongoing,
            Some(last) => {
                let win = self.board.check_win(last);
                match self.result {
                    GameResult::Won(p) => win == Some(p) && self.current == p,
                    GameResult::Draw => {
                        win.is_none() && self.board.is_full() && self.current == last.player
                    }
                    GameResult::Ongoing => {
                        win.is_none() && !self.board.is_full() && self.current == last.player.other()
                    }
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
