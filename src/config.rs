use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ai::OpponentKind;
use crate::error::ConfigError;
use crate::game::Player;
use crate::history::DEFAULT_KEY;
use crate::session::Mode;

/// Who sits where at the start of a match.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: Mode,
    pub opponent: OpponentKind,
    /// Side played by the human in PvE; the computer takes the other.
    pub human: Player,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: Mode::Pvp,
            opponent: OpponentKind::Heuristic,
            human: Player::First,
        }
    }
}

/// Where the undo history is saved between runs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            enabled: true,
            dir: PathBuf::from(".connect4"),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

/// Front-end pacing. Purely presentational.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time for a falling disc to move down one row
    pub drop_step_ms: u64,
    /// Pause before the computer moves
    pub opponent_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            drop_step_ms: 70,
            opponent_delay_ms: 220,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(ConfigError::Validation(
                "storage.key must not be empty".into(),
            ));
        }
        if key.contains(|c: char| c == '/' || c == '\\') || key == "." || key == ".." {
            return Err(ConfigError::Validation(
                "storage.key must be a plain name".into(),
            ));
        }
        if self.timing.drop_step_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.drop_step_ms must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
