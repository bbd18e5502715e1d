//! Error taxonomy
//!
//! Only precondition violations are errors. Physics and collision are total
//! and never fail.

/// A rejected request that must not advance the state machine
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("tournament data error: expected 4 players, found {found}")]
    TournamentSize { found: usize },

    #[error("tournament data error: all 6 bracket matches have been played")]
    BracketExhausted,

    #[error("tournament data error: result does not belong to scheduled match {expected}")]
    MatchCounter { expected: usize },

    #[error("tournament data error: winners requested after {played} of 6 matches")]
    TournamentIncomplete { played: usize },

    #[error("match data is still loading")]
    DataNotReady,

    #[error("need {needed} players to start, found {found}")]
    NotEnoughPlayers { needed: usize, found: usize },

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_errors_are_reported_as_data_errors() {
        let err = GameError::TournamentSize { found: 3 };
        assert!(err.to_string().starts_with("tournament data error"));
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn test_settings_error_wraps_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: GameError = json_err.into();
        assert!(matches!(err, GameError::Settings(_)));
    }
}
