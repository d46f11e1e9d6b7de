//! Ingestion boundary: nothing malformed reaches the store

use std::io::Cursor;

use vitalwatch::ingest::{file, ingest_stream, message, Message};
use vitalwatch::models::{MeasurementRecord, SignalType};
use vitalwatch::store::{InMemoryStore, RecordStore};

use super::helpers::temp_file;

#[test]
fn test_batch_and_stream_formats_agree() {
    let records = vec![
        MeasurementRecord::new(1, SignalType::SystolicPressure, 118.0, 1_000),
        MeasurementRecord::new(1, SignalType::Saturation, 96.0, 2_000),
        MeasurementRecord::new(2, SignalType::Ecg, -0.25, 3_000),
        MeasurementRecord::new(2, SignalType::Other("Cholesterol".to_string()), 180.5, 4_000),
    ];

    let batch_text: Vec<String> = records.iter().map(file::format_line).collect();
    let (_dir, path) = temp_file("output.txt", &batch_text.join("\n"));
    let batch = file::load(&path).unwrap();
    assert_eq!(batch.records, records);

    let stream_text: Vec<String> = records.iter().map(message::format_message).collect();
    let store = InMemoryStore::new();
    let summary = ingest_stream(Cursor::new(stream_text.join("\n")), &store).unwrap();
    assert_eq!(summary.accepted, records.len());
    assert_eq!(store.get_records(2, 0, 10_000).unwrap(), records[2..].to_vec());
}

#[test]
fn test_malformed_lines_never_reach_store() {
    let input = "\
Patient ID: 3, Timestamp: 100, Label: ECG, Data: 0.1
Patient ID: 3, Timestamp: 200, Label: ECG
Patient ID: 0, Timestamp: 300, Label: ECG, Data: 0.1
Patient ID: 3, Timestamp: later, Label: ECG, Data: 0.1
Patient ID: 3, Timestamp: 400, Label: ECG, Data: inf
Patient ID: 3, Timestamp: 500, Label: ECG, Data: 0.2
";
    let store = InMemoryStore::new();
    let summary = ingest_stream(Cursor::new(input), &store).unwrap();

    assert_eq!(summary.accepted, 2);
    let lines: Vec<usize> = summary.rejected.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 3, 4, 5]);
    assert!(summary.rejected[0].error.contains("expected 4 fields, found 3"));
    assert!(summary.rejected[2].error.contains("timestamp"));

    let stored = store.get_records(3, i64::MIN, i64::MAX).unwrap();
    let timestamps: Vec<i64> = stored.iter().map(|r| r.timestamp).collect();
    assert_eq!(timestamps, vec![100, 500]);
}

#[test]
fn test_message_kinds() {
    assert!(matches!(
        message::parse_message("Patient ID: 1, Timestamp: 5, Label: Saturation, Data: 97%"),
        Ok(Message::Measurement(_))
    ));
    assert!(matches!(
        message::parse_message("Patient ID: 1, Timestamp: 5, Label: Alert, Data: resolved"),
        Ok(Message::Alert { .. })
    ));
}
