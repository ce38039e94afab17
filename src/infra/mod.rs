pub mod artifact_source;
pub mod config;
pub mod evm;
pub mod telemetry;
