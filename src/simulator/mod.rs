//! Synthetic data sources for demos and pipeline tests.
//!
//! Both simulators take an injected RNG and keep their per-entity state in an
//! explicit map, so seeded runs are reproducible.

mod bistable;
mod saturation;

pub use bistable::{AlertState, BistableSimulator, SimulatorConfig, Transition};
pub use saturation::SaturationGenerator;
