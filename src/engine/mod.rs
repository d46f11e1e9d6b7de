//! Rule evaluation engine
//!
//! Turns a patient's measurement records into alert events. Each evaluator
//! module is a pure function over an extracted window; [`rule`] binds them to
//! signals and windows, and [`Evaluator`] runs a rule set against a store and
//! delivers the results.

pub mod correlation;
pub mod decline;
mod error;
mod evaluator;
pub mod rhythm;
pub mod rule;
pub mod threshold;
pub mod trend;
pub mod window;


pub use error::EvaluationError;
pub use evaluator::{EvaluationReport, Evaluator};
pub use rule::{default_rules, Check, CorrelatedLeg, Rule};
pub use threshold::Bounds;
pub use trend::TrendDirection;
pub use window::{SortOrder, TimeRange};
