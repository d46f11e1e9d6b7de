use tracing::warn;

use crate::models::AlertEvent;

use super::{EmissionError, Emitter};

/// Delivers every alert to each channel in turn.
///
/// A failing channel does not stop delivery to the others; the first failure
/// is reported once all channels have been tried.
#[derive(Default)]
pub struct FanOut {
    channels: Vec<Box<dyn Emitter>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: impl Emitter + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Emitter for FanOut {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        let mut first_error = None;
        for (index, channel) in self.channels.iter().enumerate() {
            if let Err(e) = channel.emit(alert) {
                warn!(channel = index, error = %e, "Alert channel failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
