pub mod commands;
pub mod config;
pub mod emit;
pub mod engine;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod simulator;
pub mod store;
