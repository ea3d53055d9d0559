//! Simulation configuration.
//!
//! These are plain inputs (timestep, footprint, arena size, seeding
//! preset) handed to the engine by whoever embeds it. The defaults match
//! the reference ecosystem.
//!
//! ```
//! use ecosim_core::config::{validate_config, SimConfig};
//!
//! let config = SimConfig {
//!     arena_size: 1200.0,
//!     ..Default::default()
//! };
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::components::Kind;
use crate::error::SimError;

/// Initial population mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPreset {
    #[default]
    All,
    GrassOnly,
    HerbivoreOnly,
    CarnivoreOnly,
}

impl SeedPreset {
    /// Relative draw weights for (kind, weight) when seeding
    pub fn weights(&self) -> &'static [(Kind, u32)] {
        match self {
            SeedPreset::All => &[(Kind::Grass, 11), (Kind::Herbivore, 3), (Kind::Carnivore, 2)],
            SeedPreset::GrassOnly => &[(Kind::Grass, 1)],
            SeedPreset::HerbivoreOnly => &[(Kind::Herbivore, 1)],
            SeedPreset::CarnivoreOnly => &[(Kind::Carnivore, 1)],
        }
    }
}

impl std::str::FromStr for SeedPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SeedPreset::All),
            "grass" | "grass_only" => Ok(SeedPreset::GrassOnly),
            "herbivore" | "herbivore_only" => Ok(SeedPreset::HerbivoreOnly),
            "carnivore" | "carnivore_only" => Ok(SeedPreset::CarnivoreOnly),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in simulated seconds
    pub dt: f32,
    /// Side length of every agent's square footprint
    pub agent_size: f32,
    /// Side length of the square arena
    pub arena_size: f32,
    pub seed: u64,
    /// Agents created when the world is seeded
    pub initial_agents: u32,
    pub preset: SeedPreset,
    /// Max live instances per kind
    pub population_cap: usize,
    /// Simulated seconds between population history samples
    pub history_interval: f32,
    pub history_capacity: usize,
    pub event_log_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            agent_size: 50.0,
            arena_size: 800.0,
            seed: 2014,
            initial_agents: 50,
            preset: SeedPreset::All,
            population_cap: 1000,
            history_interval: 6.0,
            history_capacity: 120,
            event_log_capacity: 64,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        let issues = validate_config(&config);
        if issues.is_empty() {
            Ok(config)
        } else {
            Err(SimError::InvalidConfig(issues))
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every problem found
pub fn validate_config(config: &SimConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if !(config.dt > 0.0 && config.dt.is_finite()) {
        issues.push(ConfigIssue {
            field: "dt",
            message: format!("must be positive, got {}", config.dt),
        });
    }
    if !(config.agent_size > 0.0) {
        issues.push(ConfigIssue {
            field: "agent_size",
            message: format!("must be positive, got {}", config.agent_size),
        });
    }
    if !(config.arena_size > config.agent_size) {
        issues.push(ConfigIssue {
            field: "arena_size",
            message: format!(
                "must be larger than agent_size ({}), got {}",
                config.agent_size, config.arena_size
            ),
        });
    }
    if config.population_cap == 0 {
        issues.push(ConfigIssue {
            field: "population_cap",
            message: "must be at least 1".into(),
        });
    }
    if !(config.history_interval > 0.0) {
        issues.push(ConfigIssue {
            field: "history_interval",
            message: format!("must be positive, got {}", config.history_interval),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&SimConfig::default()).is_empty());
    }

    #[test]
    fn test_reports_every_issue() {
        let config = SimConfig {
            dt: 0.0,
            agent_size: 50.0,
            arena_size: 20.0,
            population_cap: 0,
            ..Default::default()
        };
        let issues = validate_config(&config);
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["dt", "arena_size", "population_cap"]);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{"seed": 7, "preset": "grass_only"}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.preset, SeedPreset::GrassOnly);
        assert_eq!(config.population_cap, 1000);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        match SimConfig::from_json(r#"{"dt": -1.0}"#) {
            Err(SimError::InvalidConfig(issues)) => assert_eq!(issues[0].field, "dt"),
            other => panic!("expected invalid config, got {:?}", other),
        }
        assert!(matches!(SimConfig::from_json("{"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("all".parse::<SeedPreset>(), Ok(SeedPreset::All));
        assert_eq!("carnivore".parse::<SeedPreset>(), Ok(SeedPreset::CarnivoreOnly));
        assert!("fungus".parse::<SeedPreset>().is_err());
    }
}
