//! Computer opponents: the agent interface, the one-ply heuristic and a
//! uniform random player.

mod agent;
mod heuristic;
mod random;

use serde::{Deserialize, Serialize};

pub use agent::Agent;
pub use heuristic::{choose_move, wins_if_played, HeuristicAgent, CENTER_COLUMN};
pub use random::RandomAgent;

/// Which agent drives the computer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    #[default]
    Heuristic,
    Random,
}

impl OpponentKind {
    pub fn build(self) -> Box<dyn Agent> {
        match self {
            OpponentKind::Heuristic => Box::new(HeuristicAgent::new()),
            OpponentKind::Random => Box::new(RandomAgent::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_agents() {
        assert_eq!(OpponentKind::Heuristic.build().name(), "Heuristic");
        assert_eq!(OpponentKind::Random.build().name(), "Random");
        assert_eq!(OpponentKind::default(), OpponentKind::Heuristic);
    }
}
