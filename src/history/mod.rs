//! Undo history of game states and the storage backends it persists to.

mod log;
mod store;

pub use log::{History, DEFAULT_KEY};
pub use store::{FileStore, HistoryStore, MemoryStore};
