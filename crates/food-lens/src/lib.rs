pub mod config;
pub mod error;
pub mod food;
pub mod telemetry;
