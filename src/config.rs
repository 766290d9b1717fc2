//! Game configuration, loaded from TOML and overridden from the command line.

use crate::timing::RandomDuration;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How events are rendered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Narrated, colored text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
    /// Events as `tracing` records only.
    Log,
}

/// Configuration for one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players.
    #[serde(default = "default_players")]
    players: u32,

    /// Shortest time the music plays, in milliseconds.
    #[serde(default = "default_min_delay_ms")]
    min_delay_ms: u64,

    /// Longest time the music plays, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,

    /// Seed for the round duration generator; random if absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Output format.
    #[serde(default)]
    format: OutputFormat,

    /// Pause after each event in text mode.
    #[serde(default = "default_pace")]
    pace: bool,
}

#[instrument]
fn default_players() -> u32 {
    4
}

#[instrument]
fn default_min_delay_ms() -> u64 {
    RandomDuration::DEFAULT_MIN.as_millis() as u64
}

#[instrument]
fn default_max_delay_ms() -> u64 {
    RandomDuration::DEFAULT_MAX.as_millis() as u64
}

#[instrument]
fn default_pace() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            seed: None,
            format: OutputFormat::default(),
            pace: default_pace(),
        }
    }
}

/// Values that replace file settings when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Number of players.
    pub players: Option<u32>,
    /// Shortest round, in milliseconds.
    pub min_delay_ms: Option<u64>,
    /// Longest round, in milliseconds.
    pub max_delay_ms: Option<u64>,
    /// Generator seed.
    pub seed: Option<u64>,
    /// Output format.
    pub format: Option<OutputFormat>,
    /// Pacing switch.
    pub pace: Option<bool>,
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(players = config.players, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides and re-validates.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(players) = overrides.players {
            self.players = players;
        }
        if let Some(min) = overrides.min_delay_ms {
            self.min_delay_ms = min;
        }
        if let Some(max) = overrides.max_delay_ms {
            self.max_delay_ms = max;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(pace) = overrides.pace {
            self.pace = pace;
        }
        self.validate()?;
        Ok(self)
    }

    /// Rejects settings no game can run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::new("players must be at least 1".to_string()));
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::new(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }

    /// Builds the round duration provider described by this config.
    #[instrument(skip(self))]
    pub fn round_duration(&self) -> RandomDuration {
        let min = Duration::from_millis(self.min_delay_ms);
        let max = Duration::from_millis(self.max_delay_ms);
        match self.seed {
            Some(seed) => RandomDuration::seeded(min, max, seed),
            None => RandomDuration::new(min, max),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.players(), &4);
        assert_eq!(config.min_delay_ms(), &2000);
        assert_eq!(config.max_delay_ms(), &5000);
        assert_eq!(config.format(), &OutputFormat::Text);
        assert!(*config.pace());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GameConfig = toml::from_str("players = 7\nformat = \"json\"").unwrap();
        assert_eq!(config.players(), &7);
        assert_eq!(config.format(), &OutputFormat::Json);
        assert_eq!(config.max_delay_ms(), &5000);
    }

    #[test]
    fn test_overrides_replace_and_validate() {
        let config = GameConfig::default()
            .with_overrides(ConfigOverrides {
                players: Some(10),
                min_delay_ms: Some(0),
                max_delay_ms: Some(0),
                pace: Some(false),
                ..ConfigOverrides::default()
            })
            .unwrap();
        assert_eq!(config.players(), &10);
        assert!(!*config.pace());

        let err = GameConfig::default()
            .with_overrides(ConfigOverrides {
                min_delay_ms: Some(9000),
                ..ConfigOverrides::default()
            })
            .unwrap_err();
        assert!(err.message.contains("exceeds"));
    }
}
