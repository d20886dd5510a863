//! Error types.
//!
//! `RulesError` values are contract violations by the caller of
//! `apply_action` (a broken decision-maker or driver loop). They are returned
//! immediately and the engine never tries to recover from them.

use thiserror::Error;

use super::action::ActionKind;
use super::player::PlayerId;
use super::state::Phase;

/// Rejected `apply_action` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("{kind} is not allowed during {phase}")]
    IllegalActionForPhase { kind: ActionKind, phase: Phase },

    #[error("{actor} may not act during {phase}")]
    UnauthorizedActor { actor: PlayerId, phase: Phase },

    #[error("choose player submitted without a target")]
    MissingTarget,

    #[error("no effect is pending resolution")]
    NoPendingEffect,

    #[error("{0} cannot be targeted")]
    InvalidTarget(PlayerId),

    #[error("{0} is not seated at this table")]
    UnknownPlayer(PlayerId),

    #[error("the game is already over")]
    GameOver,

    #[error("the deck is empty")]
    DeckExhausted,
}

/// Invalid game setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RulesError::IllegalActionForPhase {
            kind: ActionKind::ChoosePlayer,
            phase: Phase::Flip,
        };
        assert_eq!(err.to_string(), "choose player is not allowed during flip phase");

        let err = RulesError::UnauthorizedActor {
            actor: PlayerId::new(2),
            phase: Phase::EffectChoose,
        };
        assert_eq!(err.to_string(), "Player 2 may not act during effect-choose phase");
    }

    #[test]
    fn test_config_error_from_json() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
