pub mod config;
pub mod contracts;
pub mod error;
pub mod types;

pub use config::{AppConfig, DeploymentConfig, PipelineConfig, TelegramConfig};
pub use error::{ChainError, ConfigError, Result};
