use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::AlertEvent;

use super::{EmissionError, Emitter};

/// Appends each alert as one JSON object per line.
pub struct JsonLinesEmitter {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesEmitter {
    /// Open (creating if needed) `path` for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EmissionError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Emitter for JsonLinesEmitter {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        let mut line = serde_json::to_vec(alert)?;
        line.push(b'\n');

        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
