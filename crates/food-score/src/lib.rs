//! Food composition scoring: processing level, diet compatibility, and macro
//! profile for a scanned product, plus the configuration and telemetry
//! plumbing the service shell needs to host the engine.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
