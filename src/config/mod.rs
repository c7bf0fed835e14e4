//! Configuration loading for the pager.
//!
//! All tunables (service endpoint, prefetch radius, gesture thresholds and
//! animation timings) are loaded from `conf/config.toml` if present. Missing
//! or invalid entries fall back to defaults so the engine can still start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel};
