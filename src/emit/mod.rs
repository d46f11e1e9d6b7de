//! Alert delivery.
//!
//! Evaluators hand every detected condition to an [`Emitter`]. Concrete
//! channels live here, and [`Pipeline`] layers delivery middleware (priority
//! marking, repetition) around any channel without the evaluators knowing.

mod collect;
mod console;
mod fanout;
mod jsonl;
pub mod middleware;

pub use collect::CollectingEmitter;
pub use console::ConsoleEmitter;
pub use fanout::FanOut;
pub use jsonl::JsonLinesEmitter;
pub use middleware::{DeliveryConfig, Middleware, Pipeline, Priority, Repeat};

use std::sync::Arc;

use thiserror::Error;

use crate::models::AlertEvent;

/// Failure of a delivery channel
#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("alert delivery I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("alert could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("alert rejected by channel '{channel}': {reason}")]
    Rejected { channel: String, reason: String },
}

/// Sink for detected alert conditions.
///
/// One call per detected condition instance. Implementations must be safe to
/// share across threads evaluating different patients.
pub trait Emitter: Send + Sync {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError>;
}

impl<E: Emitter + ?Sized> Emitter for &E {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        (**self).emit(alert)
    }
}

impl<E: Emitter + ?Sized> Emitter for Box<E> {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        (**self).emit(alert)
    }
}

impl<E: Emitter + ?Sized> Emitter for Arc<E> {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        (**self).emit(alert)
    }
}
