//! ForgePath Common - Shared utilities: logging and configuration
//!
//! This crate provides common functionality used across all ForgePath crates.

pub mod config;
pub mod logging;

pub use config::{AnalysisConfig, Config, ConfigBuilder, LoggingConfig, SimulationConfig};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
