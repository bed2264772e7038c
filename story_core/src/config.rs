//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SetupError;

/// Tunable constants for reserved encounters and the ghoul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gold granted the first time a treasure node is entered.
    pub treasure_reward: i64,

    /// Item a hazard consumes to let the player through.
    pub hazard_item: String,

    /// Gold the player starts with.
    pub starting_gold: i64,

    pub ghoul: GhoulConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            treasure_reward: 50,
            hazard_item: "fire_extinguisher".to_string(),
            starting_gold: 0,
            ghoul: GhoulConfig::default(),
        }
    }
}

/// Settings for the ghoul's hidden shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhoulConfig {
    /// Consecutive asks needed before the ghoul reveals its wares.
    pub asks_to_reveal: u64,
    pub price: i64,
    pub item: String,
}

impl Default for GhoulConfig {
    fn default() -> Self {
        Self {
            asks_to_reveal: 3,
            price: 20,
            item: "fire_extinguisher".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SetupError> {
        toml::from_str(text).map_err(|e| SetupError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SetupError::NotFound(path.to_path_buf())
            } else {
                SetupError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.treasure_reward, 50);
        assert_eq!(config.hazard_item, "fire_extinguisher");
        assert_eq!(config.ghoul.asks_to_reveal, 3);
        assert_eq!(config.ghoul.price, 20);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            treasure_reward = 75

            [ghoul]
            price = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.treasure_reward, 75);
        assert_eq!(config.ghoul.price, 30);
        assert_eq!(config.ghoul.asks_to_reveal, 3);
        assert_eq!(config.hazard_item, "fire_extinguisher");
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml_str("treasure_reward = \"lots\"").unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }
}
