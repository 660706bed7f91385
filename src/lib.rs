//! # Connect Four
//!
//! Two-player Connect Four on a 7×6 board with a persisted undo history and a
//! one-ply computer opponent. Ships with a terminal UI built on Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, immutable game state
//! - [`history`] — Undo log of game states and where it is saved
//! - [`ai`] — Agent trait, heuristic and random opponents
//! - [`session`] — Turn ownership, PvP/PvE modes, pending moves
//! - [`ui`] — Terminal UI: game view with drop animation
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod session;
pub mod ui;
