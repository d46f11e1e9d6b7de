use std::io::{self, Write};
use std::sync::Mutex;

use colored::Colorize;

use crate::models::AlertEvent;

use super::{EmissionError, Emitter};

/// Writes one coloured line per alert, to stdout unless given another writer.
pub struct ConsoleEmitter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Emitter for ConsoleEmitter<W> {
    fn emit(&self, alert: &AlertEvent) -> Result<(), EmissionError> {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(
            out,
            "{} Alert triggered for patient {}: {} ({})",
            "!".red().bold(),
            alert.patient_id.to_string().bold(),
            alert.condition.yellow(),
            alert.timestamp
        )?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_one_line_per_alert() {
        colored::control::set_override(false);
        let emitter = ConsoleEmitter::new(Vec::new());
        emitter
            .emit(&AlertEvent::new(12, "Low Saturation", 1_000))
            .unwrap();
        emitter
            .emit(&AlertEvent::new(12, "Irregular Beat", 2_000))
            .unwrap();

        let text = String::from_utf8(emitter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "! Alert triggered for patient 12: Low Saturation (1000)",
                "! Alert triggered for patient 12: Irregular Beat (2000)",
            ]
        );
    }
}
