//! CLI command implementations.

pub mod config;
pub mod goal;
pub mod habit;
pub mod log;
pub mod onboard;
pub mod progress;
pub mod stats;
