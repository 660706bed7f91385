use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::game::GameState;

use super::agent::Agent;

/// Picks uniformly among the columns that still have room.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic agent for reproducible games
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        state.legal_actions().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ROWS;

    #[test]
    fn test_never_picks_full_column() {
        let mut state = GameState::initial();
        for _ in 0..ROWS {
            state = state.apply_move(2).unwrap();
        }
        let mut agent = RandomAgent::new();
        for _ in 0..200 {
            let col = agent.select_action(&state).unwrap();
            assert_ne!(col, 2);
            assert!(state.legal_actions().contains(&col));
        }
    }

    #[test]
    fn test_seeded_self_play_finishes() {
        let mut agents = [RandomAgent::with_seed(7), RandomAgent::with_seed(11)];
        let mut state = GameState::initial();
        let mut plies = 0;

        while let Some(col) = agents[plies % 2].select_action(&state) {
            state = state.apply_move(col).unwrap();
            plies += 1;
        }

        assert!(state.is_terminal() || state.legal_actions().is_empty());
        assert!(plies >= 7);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let state = GameState::initial();
        let mut a = RandomAgent::with_seed(42);
        let mut b = RandomAgent::with_seed(42);
        let picks_a: Vec<_> = (0..20).map(|_| a.select_action(&state)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.select_action(&state)).collect();
        assert_eq!(picks_a, picks_b);
    }
}
