use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::models::{MeasurementRecord, PatientId};

use super::{RecordStore, RetrievalError};

/// Record store held entirely in memory, keyed by patient.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<PatientId, Vec<MeasurementRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an iterator of records
    pub fn from_records(records: impl IntoIterator<Item = MeasurementRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.add_record(record);
        }
        store
    }

    /// Append a record for its patient.
    pub fn add_record(&self, record: MeasurementRecord) {
        let mut records = match self.records.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.entry(record.patient_id).or_default().push(record);
    }

    /// All patient ids with at least one record, ascending
    pub fn patient_ids(&self) -> Vec<PatientId> {
        match self.records.read() {
            Ok(records) => records.keys().copied().collect(),
            Err(poisoned) => poisoned.into_inner().keys().copied().collect(),
        }
    }

    /// Total number of records across all patients
    pub fn len(&self) -> usize {
        match self.records.read() {
            Ok(records) => records.values().map(Vec::len).sum(),
            Err(poisoned) => poisoned.into_inner().values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryStore {
    fn get_records(
        &self,
        patient_id: PatientId,
        from: i64,
        to: i64,
    ) -> Result<Vec<MeasurementRecord>, RetrievalError> {
        if from > to {
            return Err(RetrievalError::InvalidRange { from, to });
        }

        let records = self
            .records
            .read()
            .map_err(|_| RetrievalError::Unavailable("record lock poisoned".to_string()))?;

        let found: Vec<MeasurementRecord> = records
            .get(&patient_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.timestamp >= from && r.timestamp <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(patient_id, from, to, count = found.len(), "Retrieved records");
        Ok(found)
    }
}
