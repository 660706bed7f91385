use tracing::{debug, warn};

use super::store::{HistoryStore, MemoryStore};
use crate::error::StoreError;
use crate::game::GameState;

/// Key used when no other identifier is configured.
pub const DEFAULT_KEY: &str = "connect4";

/// Append-only log of game states, oldest first. Never empty.
///
/// Every mutation writes the whole sequence back to the store. Storage failures are logged and otherwise ignored; the
/// in-memory log stays authoritative.
pub struct History<S: HistoryStore = MemoryStore> {
    states: Vec<GameState>,
    initial: GameState,
    key: String,
    store: S,
}

impl History<MemoryStore> {
    /// A history backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new(), DEFAULT_KEY)
    }
}

impl<S: HistoryStore> History<S> {
    /// Open the history stored under `key`, falling back to the initial game
    /// state when nothing usable is stored.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        Self::open_with_initial(store, key, GameState::initial())
    }

    /// Like [`History::open`] with a custom initial state, which is also the
    /// state [`History::clear`] returns to.
    pub fn open_with_initial(store: S, key: impl Into<String>, initial: GameState) -> Self {
        let key = key.into();
        let states = match Self::restore(&store, &key) {
            Ok(Some(states)) => {
                debug!(key = %key, len = states.len(), "restored history");
                states
            }
            Ok(None) => vec![initial],
            Err(reason) => {
                warn!(key = %key, %reason, "discarding stored history");
                vec![initial]
            }
        };

        History {
            states,
            initial,
            key,
            store,
        }
    }

    /// Read and validate the stored sequence. `Ok(None)` means nothing is
    /// stored; `Err` carries why a stored payload was unusable.
    fn restore(store: &S, key: &str) -> Result<Option<Vec<GameState>>, String> {
        let Some(payload) = store.load(key).map_err(|e| e.to_string())? else {
            return Ok(None);
        };

        let states: Vec<GameState> = serde_json::from_str(&payload).map_err(|e| e.to_string())?;
        if states.is_empty() {
            return Err("stored history is empty".into());
        }
        if let Some(i) = states.iter().position(|s| !s.is_well_formed()) {
            return Err(format!("entry {i} is not a valid game state"));
        }
        if let Some(i) = states
            .windows(2)
            .position(|pair| !is_single_move_apart(&pair[0], &pair[1]))
        {
            return Err(format!("entry {} does not follow entry {i}", i + 1));
        }

        Ok(Some(states))
    }

    /// Latest state
    pub fn current(&self) -> &GameState {
        // The log is never empty.
        &self.states[self.states.len() - 1]
    }

    /// All states, oldest first
    pub fn states(&self) -> &[GameState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.states.len() > 1
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append a state. The caller derives it from [`History::current`] with
    /// one `apply_move`; debug builds check this.
    pub fn push(&mut self, state: GameState) {
        debug_assert!(
            is_single_move_apart(self.current(), &state),
            "pushed state is not one move after the latest state"
        );
        self.states.push(state);
        self.persist();
    }

    /// Drop the latest state. The first state is never removed.
    pub fn undo(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
            self.persist();
        }
    }

    /// Replace the whole log with a single state
    pub fn reset(&mut self, initial: GameState) {
        self.states.clear();
        self.states.push(initial);
        self.persist();
    }

    /// Erase the stored log, then reset to the original initial state.
    pub fn clear(&mut self) {
        if let Err(err) = self.store.erase(&self.key) {
            warn!(key = %self.key, error = %err, "failed to erase stored history");
        }
        self.reset(self.initial);
    }

    fn persist(&mut self) {
        if let Err(err) = self.try_persist() {
            warn!(key = %self.key, error = %err, "failed to save history");
        }
    }

    fn try_persist(&mut self) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&self.states)?;
        self.store.save(&self.key, &payload)
    }
}

/// True when `next` is exactly `prev` advanced by the move `next` records.
fn is_single_move_apart(prev: &GameState, next: &GameState) -> bool {
    next.last_move()
        .is_some_and(|m| prev.apply_move(m.col).as_ref() == Ok(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameResult, Player};
    use crate::history::FileStore;

    fn advance(history: &mut History<impl HistoryStore>, columns: &[usize]) {
        for &col in columns {
            let next = history.current().apply_move(col).unwrap();
            history.push(next);
        }
    }

    #[test]
    fn test_new_history_has_initial_state() {
        let history = History::in_memory();
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), GameState::initial());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_push_and_undo() {
        let mut history = History::in_memory();
        advance(&mut history, &[3, 4]);
        assert_eq!(history.len(), 3);
        assert!(history.can_undo());
        assert_eq!(history.current().current_player(), Player::First);

        history.undo();
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().last_move().map(|m| m.col), Some(3));

        history.undo();
        assert!(!history.can_undo());
        history.undo();
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), GameState::initial());
    }

    #[test]
    fn test_can_undo_tracks_length() {
        let mut history = History::in_memory();
        for col in [0, 1, 2, 0, 1] {
            advance(&mut history, &[col]);
            assert_eq!(history.can_undo(), history.len() > 1);
        }
        for _ in 0..10 {
            history.undo();
            assert!(history.len() >= 1);
            assert_eq!(history.can_undo(), history.len() > 1);
        }
    }

    #[test]
    fn test_reset_then_current() {
        let mut history = History::in_memory();
        advance(&mut history, &[0, 1, 2]);

        let custom = GameState::initial().apply_move(6).unwrap();
        history.reset(custom);
        assert_eq!(*history.current(), custom);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_history_is_persisted_on_every_change() {
        let mut history = History::in_memory();
        advance(&mut history, &[2, 2]);

        let stored: Vec<GameState> =
            serde_json::from_str(history.store().get(DEFAULT_KEY).unwrap()).unwrap();
        assert_eq!(stored, history.states());

        history.undo();
        let stored: Vec<GameState> =
            serde_json::from_str(history.store().get(DEFAULT_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_clear_leaves_only_initial_state_stored() {
        let mut history = History::in_memory();
        advance(&mut history, &[5]);
        assert!(history.store().get(DEFAULT_KEY).is_some());

        history.clear();
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), GameState::initial());
        // Behaves as reset: the single initial state is written back
        let stored: Vec<GameState> =
            serde_json::from_str(history.store().get(DEFAULT_KEY).unwrap()).unwrap();
        assert_eq!(stored, vec![GameState::initial()]);
    }

    #[test]
    fn test_reopen_restores_sequence() {
        let mut store = MemoryStore::new();
        let mut first = History::open(store.clone(), "game");
        advance(&mut first, &[3, 3, 4]);
        store.insert("game", first.store().get("game").unwrap());

        let reopened = History::open(store, "game");
        assert_eq!(reopened.states(), first.states());
        assert_eq!(reopened.len(), 4);
    }

    #[test]
    fn test_malformed_payloads_fall_back_to_initial() {
        let valid = GameState::initial().apply_move(0).unwrap();
        let mut bad_board = serde_json::to_value(valid).unwrap();
        bad_board["board"]["cells"][0] = serde_json::json!(["empty"]);
        let mut bad_player = serde_json::to_value(valid).unwrap();
        bad_player["current"] = serde_json::json!("third");
        // Skips a state: not reachable by one move from the initial state
        let skipped = serde_json::to_string(&vec![
            GameState::initial(),
            valid.apply_move(1).unwrap(),
        ])
        .unwrap();

        let payloads = [
            "not json".to_string(),
            "[]".to_string(),
            "{}".to_string(),
            serde_json::to_string(&vec![bad_board]).unwrap(),
            serde_json::to_string(&vec![bad_player]).unwrap(),
            skipped,
        ];

        for payload in payloads {
            let mut store = MemoryStore::new();
            store.insert(DEFAULT_KEY, payload.clone());
            let history = History::open(store, DEFAULT_KEY);
            assert_eq!(history.len(), 1, "payload accepted: {payload}");
            assert_eq!(*history.current(), GameState::initial());
        }
    }

    #[test]
    fn test_finished_game_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::open(FileStore::new(dir.path()), DEFAULT_KEY);
        advance(&mut history, &[3, 4, 3, 4, 3, 4, 3]);
        assert_eq!(history.current().result(), GameResult::Won(Player::First));

        let reopened = History::open(FileStore::new(dir.path()), DEFAULT_KEY);
        assert_eq!(reopened.len(), 8);
        assert_eq!(reopened.current().result(), GameResult::Won(Player::First));
        assert!(reopened.current().is_terminal());
    }

    #[test]
    fn test_clear_rewrites_file_with_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let path = store.path_for("connect4");
        let mut history = History::open(store, "connect4");
        advance(&mut history, &[1, 2]);

        history.clear();
        let stored: Vec<GameState> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored, vec![GameState::initial()]);

        let reopened = History::open(FileStore::new(dir.path()), "connect4");
        assert_eq!(reopened.len(), 1);
        assert!(!reopened.can_undo());
    }

    #[test]
    fn test_custom_initial_state_is_clear_target() {
        let start = GameState::initial().apply_move(3).unwrap();
        let mut history = History::open_with_initial(MemoryStore::new(), "k", start);
        assert_eq!(*history.current(), start);

        advance(&mut history, &[3]);
        history.clear();
        assert_eq!(*history.current(), start);

        let reopened = History::open(history.store().clone(), "k");
        assert_eq!(reopened.states(), &[start]);
    }
}
