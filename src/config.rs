use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec2;
use crate::perception::Side;

/// One roster slot. The uniform number selects the role; the home offset
/// (left-side coordinates) defaults to the role's built-in position when
/// omitted.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub number: u8,

    #[serde(default)]
    pub home: Option<Vec2>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub team: String,
    pub side: Side,
    pub players: Vec<PlayerSlot>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read team config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse team config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("uniform number {0} is outside 1..=11")]
    BadUniform(u8),
}

impl TeamConfig {
    pub fn read_from_disk(path: impl AsRef<Path>) -> Result<TeamConfig, ConfigError> {
        let string = fs::read_to_string(path)?;
        let config: TeamConfig = serde_yaml::from_str(&string)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for slot in &self.players {
            if slot.number < 1 || slot.number > 11 {
                return Err(ConfigError::BadUniform(slot.number));
            }
        }
        Ok(())
    }
}
