pub mod alert;
pub mod constants;
pub mod patient;
pub mod record;

pub use alert::AlertEvent;
pub use patient::{Patient, PatientId};
pub use record::{MeasurementRecord, SignalType};
