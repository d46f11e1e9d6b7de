//! Runtime configuration: the rule set, simulator rates and delivery layers.
//!
//! Loaded from TOML. Nothing here is global; callers pass the loaded value
//! into each evaluator or simulator they build.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emit::DeliveryConfig;
use crate::engine::{default_rules, Rule};
use crate::simulator::SimulatorConfig;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "VITALWATCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub delivery: DeliveryConfig,
    pub rules: Vec<Rule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            delivery: DeliveryConfig::default(),
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!(path = %path.display(), rules = config.rules.len(), "Loaded config");
        Ok(config)
    }

    /// Load from `explicit`, else from `$VITALWATCH_CONFIG`, else defaults.
    ///
    /// An explicit path must exist; the environment path falls back to
    /// defaults when missing.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::load(path);
        }

        match env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            Some(path) => Self::load(&PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()?;

        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.validate()?;
            if !seen.insert(rule.name.as_str()) {
                bail!("Duplicate rule name: '{}'", rule.name);
            }
        }

        Ok(())
    }

    /// Rules that will run
    pub fn enabled_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.enabled)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }
}
