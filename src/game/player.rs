use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::First => "Red",
            Player::Second => "Blue",
        }
    }

    /// Single-character disc symbol used in text renderings
    pub fn symbol(self) -> char {
        match self {
            Player::First => 'R',
            Player::Second => 'B',
        }
    }
}
