//! Core domain types and configuration for Pulse.
//!
//! Canonical post/dashboard records shared by ingestion, analytics, storage,
//! and the API surface. This crate does no I/O.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod dashboard;
pub mod post;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dashboard::Dashboard;
pub use post::{EmotionLabel, PerformanceTier, Post, Prediction, SentimentLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
