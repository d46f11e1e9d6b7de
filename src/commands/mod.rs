//! Subcommand implementations for the `vitalwatch` binary.

pub mod evaluate;
pub mod ingest;
pub mod rules;
pub mod simulate;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
