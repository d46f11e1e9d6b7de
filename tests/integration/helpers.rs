//! Shared test helpers

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use vitalwatch::emit::{EmissionError, Emitter};
use vitalwatch::models::AlertEvent;

/// Write `content` to `name` inside a fresh temporary directory
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    (temp_dir, path)
}

/// Emitter that refuses every alert
pub struct RefusingEmitter;

impl Emitter for RefusingEmitter {
    fn emit(&self, _alert: &AlertEvent) -> Result<(), EmissionError> {
        Err(EmissionError::Rejected {
            channel: "pager".to_string(),
            reason: "offline".to_string(),
        })
    }
}
