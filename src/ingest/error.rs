use thiserror::Error;

/// Why one input line was refused at the ingestion boundary.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("missing '{field}' field")]
    MissingField { field: &'static str },

    #[error("invalid {field}: '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("patient id 0 is reserved for an absent identity")]
    ZeroPatientId,

    #[error("empty signal label")]
    EmptyLabel,

    #[error("line is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },

    #[error("unknown alert state '{value}', expected 'triggered' or 'resolved'")]
    InvalidAlertState { value: String },

    #[error("expected a measurement, found an alert transition")]
    UnexpectedAlert,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
