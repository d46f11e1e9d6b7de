use thiserror::Error;

use crate::models::PatientId;
use crate::store::RetrievalError;

/// Failure of one evaluation pass.
///
/// Emission failures are not here: they are logged and counted in the
/// report, and never abort a pass.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("invalid evaluation input: {0}")]
    InvalidInput(String),

    #[error("could not retrieve records: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("evaluation worker for patient {patient_id} panicked")]
    WorkerPanicked { patient_id: PatientId },
}
