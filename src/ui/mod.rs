//! Terminal UI: the game screen with drop animation and a delayed computer
//! turn.

mod app;
mod game_view;

pub use app::{App, Falling};
