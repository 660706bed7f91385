//! A match between two sides on top of the rule engine and history.
//!
//! The session decides who may move, keeps at most one accepted move in
//! flight and routes the computer's choice through the same path as a human
//! click. An accepted move is *pending* until [`Session::settle`] commits it
//! to the history, which lets a front-end animate the drop without changing
//! which move was accepted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::Agent;
use crate::error::PlayError;
use crate::game::{GameResult, GameState, Player};
use crate::history::{History, HistoryStore, MemoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two humans on the same device
    #[default]
    Pvp,
    /// Human against the computer
    Pve,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pvp => "PvP",
            Mode::Pve => "PvE",
        }
    }

    pub fn toggled(self) -> Mode {
        match self {
            Mode::Pvp => Mode::Pve,
            Mode::Pve => Mode::Pvp,
        }
    }
}

pub struct Session<S: HistoryStore = MemoryStore> {
    history: History<S>,
    mode: Mode,
    human: Player,
    opponent: Box<dyn Agent>,
    pending: Option<GameState>,
}

impl<S: HistoryStore> Session<S> {
    pub fn new(history: History<S>, mode: Mode, human: Player, opponent: Box<dyn Agent>) -> Self {
        Session {
            history,
            mode,
            human,
            opponent,
            pending: None,
        }
    }

    /// Latest committed state
    pub fn state(&self) -> &GameState {
        self.history.current()
    }

    /// Accepted move waiting for [`Session::settle`]
    pub fn pending(&self) -> Option<&GameState> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Side played by the human in PvE
    pub fn human(&self) -> Player {
        self.human
    }

    /// Side played by the computer in PvE
    pub fn computer(&self) -> Player {
        self.human.other()
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// The computer should move now.
    pub fn is_computer_turn(&self) -> bool {
        let state = self.state();
        self.mode == Mode::Pve && !state.is_terminal() && state.current_player() == self.computer()
    }

    /// Play `column` for the side to move on behalf of a human.
    ///
    /// On success the resulting state is pending and returned; nothing is
    /// committed until [`Session::settle`].
    pub fn play(&mut self, column: usize) -> Result<&GameState, PlayError> {
        if self.pending.is_some() {
            return Err(PlayError::Busy);
        }
        if self.is_computer_turn() {
            return Err(PlayError::NotYourTurn);
        }
        self.start_move(column)
    }

    /// Let the computer pick and play a column. Returns `Ok(None)` when it is
    /// not the computer's turn.
    pub fn opponent_move(&mut self) -> Result<Option<&GameState>, PlayError> {
        if self.pending.is_some() {
            return Err(PlayError::Busy);
        }
        if !self.is_computer_turn() {
            return Ok(None);
        }

        let Some(column) = self.opponent.select_action(self.history.current()) else {
            return Ok(None);
        };
        debug!(agent = self.opponent.name(), column, "computer chose column");
        self.start_move(column).map(Some)
    }

    fn start_move(&mut self, column: usize) -> Result<&GameState, PlayError> {
        let next = self.history.current().apply_move(column)?;
        debug!(
            column,
            player = self.history.current().current_player().name(),
            "move accepted"
        );
        Ok(&*self.pending.insert(next))
    }

    /// Commit the pending move. Returns false when nothing was pending.
    pub fn settle(&mut self) -> bool {
        let Some(next) = self.pending.take() else {
            return false;
        };
        match next.result() {
            GameResult::Won(winner) => info!(winner = winner.name(), "game won"),
            GameResult::Draw => info!("game drawn"),
            GameResult::Ongoing => {}
        }
        self.history.push(next);
        true
    }

    /// Play and commit in one step, for callers that do not animate.
    pub fn play_now(&mut self, column: usize) -> Result<GameState, PlayError> {
        self.play(column)?;
        self.settle();
        Ok(*self.state())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn undo(&mut self) {
        self.pending = None;
        self.history.undo();
    }

    /// Start a new game
    pub fn reset(&mut self) {
        self.pending = None;
        self.history.reset(GameState::initial());
    }

    /// Forget the saved game and start over
    pub fn clear_save(&mut self) {
        self.pending = None;
        self.history.clear();
    }

    /// Switch mode. Always starts a new game.
    pub fn set_mode(&mut self, mode: Mode) {
        info!(mode = mode.label(), "mode changed");
        self.mode = mode;
        self.reset();
    }

    pub fn status_text(&self) -> String {
        let state = self.state();
        match state.result() {
            GameResult::Draw => "Draw!".to_string(),
            GameResult::Won(winner) => format!("Winner: {}", winner.name()),
            GameResult::Ongoing if self.is_computer_turn() => {
                "Computer is thinking\u{2026}".to_string()
            }
            GameResult::Ongoing => format!("Turn: {}", state.current_player().name()),
        }
    }
}
