use alloy_primitives::B256;
use thiserror::Error;

/// Failures raised while talking to the chain.
///
/// This is the underlying cause wrapped by every pipeline step error.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted: {tx_hash}")]
    Reverted { tx_hash: B256 },

    #[error("ABI decode error: {0}")]
    Decode(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),
}

/// Failures raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Deployment file not found: {0}")]
    DeploymentFileNotFound(String),

    #[error("Failed to parse deployment file: {0}")]
    DeploymentParseError(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ChainError>;
