use std::path::PathBuf;

/// Reasons a move is not applied. None of these are fatal: the caller simply
/// ignores the attempt and no history entry is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is outside the board")]
    InvalidColumn,

    #[error("column is full")]
    ColumnFull,

    #[error("game is over")]
    GameOver,
}

/// Errors raised by a history persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections raised by a match session on top of the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("a move is still being played")]
    Busy,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(MoveError::ColumnFull.to_string(), "column is full");
        assert_eq!(MoveError::GameOver.to_string(), "game is over");
    }

    #[test]
    fn test_play_error_wraps_move_error() {
        let err: PlayError = MoveError::InvalidColumn.into();
        assert_eq!(err, PlayError::Move(MoveError::InvalidColumn));
        assert_eq!(err.to_string(), "column is outside the board");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Io {
            path: PathBuf::from("saves/connect4.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "I/O error on saves/connect4.json: denied");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("storage.key must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: storage.key must not be empty"
        );
    }
}
