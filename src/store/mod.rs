//! Record storage boundary.
//!
//! The engine only consumes the [`RecordStore`] trait; storage itself is an
//! external collaborator. [`InMemoryStore`] backs the CLI and the tests.

mod memory;

pub use memory::InMemoryStore;

use thiserror::Error;

use crate::models::{MeasurementRecord, PatientId};

/// Failure to obtain records from a store.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response from record store: {0}")]
    Malformed(String),

    #[error("invalid time range: from {from} is after to {to}")]
    InvalidRange { from: i64, to: i64 },
}

/// Source of measurement records for a patient.
///
/// Implementations must be safe for concurrent use; the engine may evaluate
/// several patients against the same store at once.
pub trait RecordStore: Send + Sync {
    /// Records for `patient_id` with `from <= timestamp <= to`, in any order.
    fn get_records(
        &self,
        patient_id: PatientId,
        from: i64,
        to: i64,
    ) -> Result<Vec<MeasurementRecord>, RetrievalError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get_records(
        &self,
        patient_id: PatientId,
        from: i64,
        to: i64,
    ) -> Result<Vec<MeasurementRecord>, RetrievalError> {
        (**self).get_records(patient_id, from, to)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn get_records(
        &self,
        patient_id: PatientId,
        from: i64,
        to: i64,
    ) -> Result<Vec<MeasurementRecord>, RetrievalError> {
        (**self).get_records(patient_id, from, to)
    }
}
