//! Configuration file support for PillPet.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pillpet/config.toml`.
//!
//! The source app hard-coded its engine constants (and different screen
//! revisions disagreed on them); here they all live in one explicit
//! configuration structure that every surface shares.

use crate::{Error, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Health score engine parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Score assigned to a user whose record has no health value yet.
    /// Source revisions disagreed between 70 and 80; 70 is the default here.
    #[serde(default = "default_starting_health")]
    pub starting_health: i32,

    /// Score gained for full adherence on a day.
    #[serde(default = "default_daily_reward")]
    pub daily_reward: f64,

    /// Score lost for complete non-adherence on a day. Asymmetric on
    /// purpose: missing doses costs more than taking them earns.
    #[serde(default = "default_daily_penalty")]
    pub daily_penalty: f64,

    /// Local wall-clock time at which a day's update becomes eligible,
    /// as `HH:MM`.
    #[serde(default = "default_end_of_day")]
    pub end_of_day: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            starting_health: default_starting_health(),
            daily_reward: default_daily_reward(),
            daily_penalty: default_daily_penalty(),
            end_of_day: default_end_of_day(),
        }
    }
}

impl HealthConfig {
    /// Parse the configured end-of-day instant.
    ///
    /// Falls back to 23:59 with a warning if the configured string is
    /// malformed, so a bad config file cannot stall the engine.
    pub fn end_of_day_time(&self) -> NaiveTime {
        match NaiveTime::parse_from_str(&self.end_of_day, "%H:%M") {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(
                    "Invalid end_of_day {:?} ({}), falling back to 23:59",
                    self.end_of_day,
                    e
                );
                NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
            }
        }
    }
}

/// Schedule resolver parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes after a reminder time before a dose counts as missed.
    #[serde(default = "default_grace_period_minutes")]
    pub grace_period_minutes: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            grace_period_minutes: default_grace_period_minutes(),
        }
    }
}

// Default value functions
fn default_starting_health() -> i32 {
    70
}

fn default_daily_reward() -> f64 {
    10.0
}

fn default_daily_penalty() -> f64 {
    15.0
}

fn default_end_of_day() -> String {
    "23:59".into()
}

fn default_grace_period_minutes() -> i64 {
    15
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("pillpet").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
