use crate::game::GameState;

/// Universal interface for computer opponents.
pub trait Agent {
    /// Select a column to play for the side to move in `state`. Returns
    /// `None` when the state has no legal move.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
