//! Delivery middleware composed around a core emitter.
//!
//! A [`Pipeline`] runs its layers in insertion order; each layer receives the
//! alert and the remainder of the chain, and decides how (and how often) to
//! pass the alert on. Plain closures with the right signature are layers too.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::AlertEvent;

use super::{EmissionError, Emitter};

/// Condition prefix added to alerts marked as priority.
pub const PRIORITY_PREFIX: &str = "[PRIORITY]";

/// One delivery layer
pub trait Middleware: Send + Sync {
    fn handle(&self, alert: &AlertEvent, next: &dyn Emitter) -> Result<(), EmissionError>;
}

impl<F> Middleware for F
where
    F: Fn(&AlertEvent, &dyn Emitter) -> Result<(), EmissionError> + Send + Sync,
{
    fn handle(&self, alert: &AlertEvent, next: &dyn Emitter) -> Result<(), EmissionError> {
        self(alert, next)
    }
}

/// Remaining layers plus the core, viewed as an emitter
struct Next<'a> {
    layers: &'a [Box<dyn Middleware>],
    core: &'a dyn Emitter,
}

impl Emitter for Next<'_> {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        match self.layers.split_first() {
            Some((layer, rest)) => layer.handle(
                alert,
                &Next {
                    layers: rest,
                    core: self.core,
                },
            ),
            None => self.core.emit(alert),
        }
    }
}

/// Ordered middleware wrapped around a core emitter
pub struct Pipeline<E> {
    layers: Vec<Box<dyn Middleware>>,
    core: E,
}

impl<E: Emitter> Pipeline<E> {
    pub fn new(core: E) -> Self {
        Self {
            layers: Vec::new(),
            core,
        }
    }

    /// Append a layer; layers added first see the alert first
    pub fn layer(mut self, middleware: impl Middleware + 'static) -> Self {
        self.layers.push(Box::new(middleware));
        self
    }

    pub fn push(&mut self, middleware: Box<dyn Middleware>) {
        self.layers.push(middleware);
    }

    pub fn core(&self) -> &E {
        &self.core
    }
}

impl<E: Emitter> Emitter for Pipeline<E> {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        Next {
            layers: &self.layers,
            core: &self.core,
        }
        .emit(alert)
    }
}

/// Marks alerts whose condition mentions one of the configured conditions.
#[derive(Debug, Clone, Default)]
pub struct Priority {
    conditions: Vec<String>,
}

impl Priority {
    pub fn new(conditions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            conditions: conditions
                .into_iter()
                .map(|c| c.into().to_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, alert: &AlertEvent) -> bool {
        let condition = alert.condition.to_lowercase();
        self.conditions.iter().any(|c| condition.contains(c.as_str()))
    }
}

impl Middleware for Priority {
    fn handle(&self, alert: &AlertEvent, next: &dyn Emitter) -> Result<(), EmissionError> {
        if !self.matches(alert) || alert.condition.starts_with(PRIORITY_PREFIX) {
            return next.emit(alert);
        }

        warn!(
            patient_id = alert.patient_id,
            condition = %alert.condition,
            "Priority alert"
        );
        let marked = AlertEvent::new(
            alert.patient_id,
            format!("{PRIORITY_PREFIX} {}", alert.condition),
            alert.timestamp,
        );
        next.emit(&marked)
    }
}

/// Delivers each alert `1 + extra` times, stopping at the first failure.
#[derive(Debug, Clone, Copy)]
pub struct Repeat {
    extra: u32,
}

impl Repeat {
    pub fn new(extra: u32) -> Self {
        Self { extra }
    }
}

impl Middleware for Repeat {
    fn handle(&self, alert: &AlertEvent, next: &dyn Emitter) -> Result<(), EmissionError> {
        for _ in 0..=self.extra {
            next.emit(alert)?;
        }
        Ok(())
    }
}

/// Delivery middleware settings, as read from configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Condition substrings (case-insensitive) that mark an alert as priority
    #[serde(default)]
    pub priority_conditions: Vec<String>,
    /// Additional deliveries of every alert
    #[serde(default)]
    pub repeat: u32,
}

impl DeliveryConfig {
    /// Wrap `core` in the configured layers: priority marking, then repetition
    pub fn pipeline<E: Emitter>(&self, core: E) -> Pipeline<E> {
        let mut pipeline = Pipeline::new(core);
        if !self.priority_conditions.is_empty() {
            pipeline.push(Box::new(Priority::new(self.priority_conditions.clone())));
        }
        if self.repeat > 0 {
            pipeline.push(Box::new(Repeat::new(self.repeat)));
        }
        pipeline
    }
}
