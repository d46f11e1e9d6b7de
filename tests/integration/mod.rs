//! Integration tests for vitalwatch
//!
//! These tests exercise the ingestion boundary, the alert simulators and the
//! delivery pipeline through the public library API.

pub mod delivery;
pub mod helpers;
pub mod ingestion;
pub mod simulator;
