use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric patient identity. Zero is reserved as the absent identity.
pub type PatientId = u32;

/// A monitored patient.
///
/// Metadata is carried for display only; evaluation reads nothing but the id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Patient {
    pub fn new(id: PatientId) -> Self {
        Self {
            id,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this patient carries a usable identity
    pub fn has_identity(&self) -> bool {
        self.id != 0
    }
}
