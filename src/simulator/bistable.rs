//! Two-state trigger/resolve process, one independent chain per entity.
//!
//! From `Resolved` an entity triggers with probability `p = 1 - e^(-λ)` per
//! step; from `Triggered` it resolves with probability `r`. Only state changes
//! produce a [`Transition`].

use std::collections::HashMap;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::constants::simulator::{DEFAULT_LAMBDA, DEFAULT_RESOLVE_PROBABILITY};
use crate::models::PatientId;

/// Alert state of one simulated entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    #[default]
    Resolved,
    Triggered,
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertState::Resolved => write!(f, "resolved"),
            AlertState::Triggered => write!(f, "triggered"),
        }
    }
}

/// Rates of the bistable process
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Poisson rate of trigger events per step
    pub lambda: f64,
    /// Probability of resolving on each step while triggered
    pub resolve_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            resolve_probability: DEFAULT_RESOLVE_PROBABILITY,
        }
    }
}

impl SimulatorConfig {
    /// Probability of at least one event at rate λ within a step
    pub fn trigger_probability(&self) -> f64 {
        -(-self.lambda).exp_m1()
    }

    /// Long-run share of steps spent triggered, `p / (p + r)`
    pub fn stationary_triggered_fraction(&self) -> f64 {
        let p = self.trigger_probability();
        let total = p + self.resolve_probability;
        if total == 0.0 {
            0.0
        } else {
            p / total
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            bail!(
                "Simulator lambda must be a finite, non-negative rate, got {}",
                self.lambda
            );
        }
        if !(0.0..=1.0).contains(&self.resolve_probability) {
            bail!(
                "Simulator resolve_probability must be within [0, 1], got {}",
                self.resolve_probability
            );
        }
        Ok(())
    }
}

/// A state change of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub entity: PatientId,
    pub from: AlertState,
    pub to: AlertState,
    /// Milliseconds since the Unix epoch, as supplied by the caller
    pub timestamp: i64,
}

/// Bistable alert simulator over any number of entities.
///
/// Stepping takes `&mut self`, so at most one step per entity is ever in
/// flight. Partition entities across several simulators to step them in
/// parallel.
#[derive(Debug)]
pub struct BistableSimulator<R = StdRng> {
    config: SimulatorConfig,
    rng: R,
    states: HashMap<PatientId, AlertState>,
}

impl BistableSimulator<StdRng> {
    /// Simulator seeded from operating system entropy
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible simulator
    pub fn seeded(config: SimulatorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BistableSimulator<R> {
    pub fn with_rng(config: SimulatorConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            states: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Current state of `entity`; unseen entities are `Resolved`
    pub fn state(&self, entity: PatientId) -> AlertState {
        self.states.get(&entity).copied().unwrap_or_default()
    }

    /// Number of entities currently triggered
    pub fn triggered_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == AlertState::Triggered)
            .count()
    }

    /// Advance `entity` by one step, returning the transition if its state changed
    pub fn step(&mut self, entity: PatientId, timestamp: i64) -> Option<Transition> {
        let from = self.state(entity);
        let u: f64 = self.rng.gen();

        let to = match from {
            AlertState::Resolved if u < self.config.trigger_probability() => AlertState::Triggered,
            AlertState::Triggered if u < self.config.resolve_probability => AlertState::Resolved,
            unchanged => unchanged,
        };

        if to == from {
            return None;
        }

        self.states.insert(entity, to);
        trace!(entity, %from, %to, "Alert state changed");
        Some(Transition {
            entity,
            from,
            to,
            timestamp,
        })
    }
}
