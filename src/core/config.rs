//! Game configuration.
//!
//! Every knob has a default matching the published rules, so an empty JSON
//! object is a valid configuration. The CLI loads a file and then applies
//! flag overrides through the `with_*` methods.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;

/// Most seats a single table supports.
pub const MAX_PLAYERS: usize = 12;

/// Tunable rule and presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// First cumulative score at or above this ends the game.
    pub max_score: u32,

    /// Bonus for collecting seven unique numbers.
    pub seven_card_bonus: u32,

    /// Forced draws triggered by a Flip three.
    pub flip_three_draws: u8,

    /// Whether observations reveal the other players' hands.
    pub open_hands: bool,

    /// Whether observations carry per-player bust probabilities.
    pub show_probabilities: bool,

    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_score: 200,
            seven_card_bonus: 15,
            flip_three_draws: 3,
            open_hands: false,
            show_probabilities: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON object. Missing fields take their defaults; unknown
    /// fields are rejected.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ConfigError::Invalid("configuration must be a JSON object".into()));
        }
        let config: GameConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings that would make the game unplayable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_score == 0 {
            return Err(ConfigError::Invalid("max_score must be positive".into()));
        }
        if self.flip_three_draws == 0 {
            return Err(ConfigError::Invalid("flip_three_draws must be positive".into()));
        }
        Ok(())
    }

    pub fn with_max_score(mut self, max_score: u32) -> Self {
        self.max_score = max_score;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_open_hands(mut self, open: bool) -> Self {
        self.open_hands = open;
        self
    }

    pub fn with_probabilities(mut self, show: bool) -> Self {
        self.show_probabilities = show;
        self
    }

    pub fn with_seven_card_bonus(mut self, bonus: u32) -> Self {
        self.seven_card_bonus = bonus;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.max_score, 200);
        assert_eq!(config.seven_card_bonus, 15);
        assert_eq!(config.flip_three_draws, 3);
        assert!(config.show_probabilities);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default().with_max_score(50).with_seed(9).with_open_hands(true);

        assert_eq!(config.max_score, 50);
        assert_eq!(config.seed, Some(9));
        assert!(config.open_hands);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "max_score": 120, "seed": 3 }"#).unwrap();

        assert_eq!(config.max_score, 120);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.seven_card_bonus, 15);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "max_score": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(GameConfig::from_json_str("[1, 2]"), Err(ConfigError::Invalid(_))));
        assert!(matches!(GameConfig::from_json_str("7"), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "max_scor": 50 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(GameConfig::from_json_str("{ max_score"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = GameConfig::default().with_seed(77);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
