//! Line-oriented stream ingestion into a store.

use std::io::BufRead;

use serde::Serialize;
use tracing::debug;

use crate::simulator::AlertState;
use crate::store::InMemoryStore;

use super::error::IngestError;
use super::message::{parse_message, Message};
use super::{for_each_line, reject, RejectedLine};

/// Counts from one stream ingestion run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSummary {
    /// Measurements added to the store
    pub accepted: usize,
    /// Alert lines seen with `triggered`
    pub triggered: usize,
    /// Alert lines seen with `resolved`
    pub resolved: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Read wire messages from `reader` until EOF, adding measurements to `store`.
///
/// Malformed lines, including lines that are not UTF-8, are logged and
/// skipped; only an I/O failure ends the run early. Any `BufRead` works,
/// including a `BufReader` around a socket.
pub fn ingest_stream<R: BufRead>(
    reader: R,
    store: &InMemoryStore,
) -> Result<StreamSummary, IngestError> {
    let mut summary = StreamSummary::default();

    for_each_line(reader, |number, line| {
        let line = match line {
            Ok(line) => line,
            Err(rejected) => {
                summary.rejected.push(rejected);
                return;
            }
        };

        match parse_message(&line) {
            Ok(Message::Measurement(record)) => {
                store.add_record(record);
                summary.accepted += 1;
            }
            Ok(Message::Alert {
                patient_id, state, ..
            }) => {
                debug!(patient_id, %state, "Alert transition received");
                match state {
                    AlertState::Triggered => summary.triggered += 1,
                    AlertState::Resolved => summary.resolved += 1,
                }
            }
            Err(e) => summary.rejected.push(reject(number, line, &e)),
        }
    })?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use std::io::Cursor;

    #[test]
    fn test_stream_into_store() {
        let input = "\
Patient ID: 19, Timestamp: 1000, Label: Saturation, Data: 90%
Patient ID: 19, Timestamp: 1500, Label: Alert, Data: triggered
garbage
Patient ID: 20, Timestamp: 2000, Label: ECG, Data: 0.5

Patient ID: 19, Timestamp: 2500, Label: Alert, Data: resolved
";
        let store = InMemoryStore::new();
        let summary = ingest_stream(Cursor::new(input), &store).unwrap();

        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.triggered, 1);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].line, 3);

        let records = store.get_records(19, 0, 10_000).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 90.0);
        assert_eq!(store.patient_ids(), vec![19, 20]);
    }

    #[test]
    fn test_undecodable_line_is_skipped() {
        let mut input = b"Patient ID: 1, Timestamp: 100, Label: ECG, Data: 0.1\n".to_vec();
        input.extend_from_slice(b"Patient ID: 1, Timestamp: 200, Label: ");
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b", Data: 0.2\nPatient ID: 1, Timestamp: 300, Label: ECG, Data: 0.3\n");

        let store = InMemoryStore::new();
        let summary = ingest_stream(Cursor::new(input), &store).unwrap();

        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].line, 2);
        let timestamps: Vec<i64> = store
            .get_records(1, 0, 1_000)
            .unwrap()
            .iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(timestamps, vec![100, 300]);
    }
}
