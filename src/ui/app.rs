use crate::config::TimingConfig;
use crate::error::{MoveError, PlayError};
use crate::game::{GameResult, Player, COLS};
use crate::history::HistoryStore;
use crate::session::Session;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use super::game_view::{self, GameView};

/// How long to wait for input before advancing animations.
const FRAME: Duration = Duration::from_millis(16);

/// A disc on its way down. Purely visual: the move is already accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Falling {
    pub col: usize,
    pub row: usize,
    pub target_row: usize,
    pub player: Player,
    next_step: Instant,
}

pub struct App<S: HistoryStore> {
    session: Session<S>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    falling: Option<Falling>,
    opponent_due: Option<Instant>,
    drop_step: Duration,
    opponent_delay: Duration,
}

impl<S: HistoryStore> App<S> {
    pub fn new(session: Session<S>, timing: &TimingConfig) -> Self {
        App {
            session,
            selected_column: 3, // Start in middle
            should_quit: false,
            message: None,
            falling: None,
            opponent_due: None,
            drop_step: Duration::from_millis(timing.drop_step_ms),
            opponent_delay: Duration::from_millis(timing.opponent_delay_ms),
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn falling(&self) -> Option<Falling> {
        self.falling
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.tick(Instant::now());
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece(self.selected_column, now);
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_piece(self.selected_column, now);
            }
            KeyCode::Char('u') => {
                if self.session.can_undo() {
                    self.stop_animations();
                    self.session.undo();
                }
            }
            KeyCode::Char('r') => {
                self.stop_animations();
                self.session.reset();
                self.message = Some("New game started!".to_string());
            }
            KeyCode::Char('c') => {
                self.stop_animations();
                self.session.clear_save();
                self.message = Some("Saved game cleared.".to_string());
            }
            KeyCode::Char('m') => {
                self.stop_animations();
                let mode = self.session.mode().toggled();
                self.session.set_mode(mode);
                self.message = Some(format!("{} mode", mode.label()));
            }
            _ => {}
        }
    }

    /// Drop piece in a column for the human side
    fn drop_piece(&mut self, col: usize, now: Instant) {
        match self.session.play(col) {
            Ok(_) => self.start_falling(now),
            // A drop is still animating; ignore the click
            Err(PlayError::Busy) => {}
            Err(PlayError::NotYourTurn) => {
                self.message = Some("Wait for the computer!".to_string());
            }
            Err(PlayError::Move(MoveError::ColumnFull)) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(PlayError::Move(MoveError::InvalidColumn)) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(PlayError::Move(MoveError::GameOver)) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
        }
    }

    fn start_falling(&mut self, now: Instant) {
        let Some(last) = self.session.pending().and_then(|s| s.last_move()) else {
            return;
        };
        self.falling = Some(Falling {
            col: last.col,
            row: 0,
            target_row: last.row,
            player: last.player,
            next_step: now + self.drop_step,
        });
        // A disc landing on the top row has nowhere to fall
        if last.row == 0 {
            self.finish_falling();
        }
    }

    fn finish_falling(&mut self) {
        self.falling = None;
        self.session.settle();
        self.message = match self.session.state().result() {
            GameResult::Won(player) => Some(format!("{} wins!", player.name())),
            GameResult::Draw => Some("It's a draw!".to_string()),
            GameResult::Ongoing => self.message.take(),
        };
    }

    fn stop_animations(&mut self) {
        self.falling = None;
        self.opponent_due = None;
    }

    /// Advance the drop animation and the computer's turn to `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(falling) = self.falling.as_mut() {
            while now >= falling.next_step && falling.row < falling.target_row {
                falling.row += 1;
                falling.next_step += self.drop_step;
            }
            if falling.row >= falling.target_row {
                self.finish_falling();
            }
            return;
        }

        if !self.session.is_computer_turn() {
            self.opponent_due = None;
            return;
        }

        match self.opponent_due {
            None => self.opponent_due = Some(now + self.opponent_delay),
            Some(due) if now >= due => {
                self.opponent_due = None;
                if let Ok(Some(_)) = self.session.opponent_move() {
                    self.start_falling(now);
                }
            }
            Some(_) => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let state = self.session.state();
        let view = GameView {
            board: state.board(),
            last_move: state.last_move(),
            falling: self.falling.map(|f| (f.row, f.col, f.player)),
            selected_column: self.selected_column,
            status: self.session.status_text(),
            mode: self.session.mode(),
            can_undo: self.session.can_undo(),
        };
        game_view::render(frame, &view, &self.message);
    }
}
