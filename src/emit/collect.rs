use std::sync::Mutex;

use crate::models::AlertEvent;

use super::{EmissionError, Emitter};

/// Keeps every delivered alert in memory.
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    alerts: Mutex<Vec<AlertEvent>>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the alerts delivered so far
    pub fn alerts(&self) -> Vec<AlertEvent> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain the alerts delivered so far
    pub fn take(&self) -> Vec<AlertEvent> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Delivered alerts whose condition equals `condition`
    pub fn count_condition(&self, condition: &str) -> usize {
        self.alerts()
            .iter()
            .filter(|a| a.condition == condition)
            .count()
    }
}

impl Emitter for CollectingEmitter {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        let mut alerts = match self.alerts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        alerts.push(alert.clone());
        Ok(())
    }
}
