//! Configuration layer

mod app_config;
mod triage;

pub use app_config::{AppConfig, LogFormat, LoggingConfig};
pub use triage::TriageConfig;
