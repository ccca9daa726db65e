use crate::error::ConfigError;
use crate::types::{AmountSpec, FeeTier, LendingProtocol, SlippagePolicy, TokenRegistry};
use alloy_primitives::Address;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, ConfigError>;

/// Fixed contract addresses for one chain, loaded from `deployments/<chain_id>.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub tokens: TokenRegistry,
    pub uniswap_v3_factory: Address,
    pub swap_router: Address,
    /// Aave address registry (`LendingPoolAddressesProvider` / `PoolAddressesProvider`)
    pub lending_addresses_provider: Address,
    #[serde(default)]
    pub lending_protocol: LendingProtocol,
    #[serde(default)]
    pub fee_tier: FeeTier,
    pub explorer_url: String,
}

/// A value that must never show up in logs
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}

/// Runtime configuration from environment variables
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub private_key: Secret,
}

/// Settings the pipeline needs for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub tokens: TokenRegistry,
    pub factory: Address,
    pub router: Address,
    pub lending_addresses_provider: Address,
    pub lending_protocol: LendingProtocol,
    pub fee_tier: FeeTier,
    pub slippage: SlippagePolicy,
    /// Seconds from submission until the swap deadline
    pub swap_deadline_secs: u64,
    pub explorer_url: String,
}

/// Telegram notification configuration for run summaries
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Enable Telegram notifications (default: true if bot_token and chat_id are set)
    pub enabled: bool,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    pub fn from_env() -> Self {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").ok();
        let chat_id = env::var("TELEGRAM_CHAT_ID").ok();
        let enabled = env::var("TELEGRAM_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(bot_token.is_some() && chat_id.is_some());

        Self {
            enabled,
            bot_token,
            chat_id,
        }
    }

    /// Check if Telegram is fully configured and enabled
    pub fn is_configured(&self) -> bool {
        self.enabled && self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub private_key: Secret,
    /// Blocks to wait on top of inclusion before a receipt counts as confirmed
    pub confirmations: u64,
    pub pipeline: PipelineConfig,
    pub telegram: TelegramConfig,
}

impl EnvConfig {
    /// Load configuration from environment variables. A `chain_id` given
    /// here takes precedence over `CHAIN_ID`.
    pub fn load(chain_id: Option<u64>) -> Result<Self> {
        let chain_id = match chain_id {
            Some(id) => id,
            None => env::var("CHAIN_ID")
                .map_err(|_| ConfigError::MissingEnvVar("CHAIN_ID".to_string()))?
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "CHAIN_ID".to_string(),
                    reason: "expected an integer".to_string(),
                })?,
        };

        let rpc_url = sanitize(
            env::var("RPC_URL").map_err(|_| ConfigError::MissingEnvVar("RPC_URL".to_string()))?,
        );

        let private_key = Secret(sanitize(
            env::var("PRIVATE_KEY")
                .map_err(|_| ConfigError::MissingEnvVar("PRIVATE_KEY".to_string()))?,
        ));

        Ok(Self {
            chain_id,
            rpc_url,
            private_key,
        })
    }
}

/// Strip surrounding quotes and whitespace left over from `.env` files
fn sanitize(value: String) -> String {
    let trimmed = value.trim();
    let without_quotes = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    without_quotes.to_string()
}

impl DeploymentConfig {
    /// Load deployment configuration from `<dir>/<chain_id>.json`
    pub fn load(dir: &Path, chain_id: u64) -> Result<Self> {
        let path = Self::deployment_path(dir, chain_id);
        let content = fs::read_to_string(&path)
            .map_err(|_| ConfigError::DeploymentFileNotFound(path.display().to_string()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::DeploymentParseError(e.to_string()))
    }

    fn deployment_path(dir: &Path, chain_id: u64) -> PathBuf {
        dir.join(format!("{}.json", chain_id))
    }
}

impl PipelineConfig {
    /// Combine a deployment with optional environment overrides
    pub fn from_deployment(deployment: DeploymentConfig) -> Result<Self> {
        let mut config = Self {
            tokens: deployment.tokens,
            factory: deployment.uniswap_v3_factory,
            router: deployment.swap_router,
            lending_addresses_provider: deployment.lending_addresses_provider,
            lending_protocol: deployment.lending_protocol,
            fee_tier: deployment.fee_tier,
            slippage: SlippagePolicy::AcceptAny,
            swap_deadline_secs: env::var("SWAP_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            explorer_url: deployment.explorer_url,
        };

        if let Ok(fee) = env::var("FEE_TIER") {
            config.set_fee_tier(parse_fee_tier(&fee)?);
        }
        if let Ok(min_out) = env::var("MIN_AMOUNT_OUT") {
            config.set_min_amount_out(&min_out)?;
        }

        Ok(config)
    }

    pub fn set_fee_tier(&mut self, fee: FeeTier) {
        self.fee_tier = fee;
    }

    /// Require at least `raw` (in destination-token human units) from the swap
    pub fn set_min_amount_out(&mut self, raw: &str) -> Result<()> {
        let amount = AmountSpec::parse(raw, &self.tokens.destination).map_err(|e| {
            ConfigError::InvalidValue {
                key: "MIN_AMOUNT_OUT".to_string(),
                reason: e.to_string(),
            }
        })?;
        self.slippage = SlippagePolicy::MinimumOutput(amount.base_units());
        Ok(())
    }
}

/// Parse a fee tier given as an integer in hundredths of a basis point
pub fn parse_fee_tier(raw: &str) -> Result<FeeTier> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(FeeTier::new)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "FEE_TIER".to_string(),
            reason: format!("{} is not a valid uint24 fee", raw),
        })
}

impl AppConfig {
    /// Load complete configuration from environment and deployment file
    pub fn load(chain_id: Option<u64>) -> Result<Self> {
        let env_config = EnvConfig::load(chain_id)?;

        let deployments_dir = env::var("DEPLOYMENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("deployments"));
        let deployment = DeploymentConfig::load(&deployments_dir, env_config.chain_id)?;

        let confirmations = env::var("CONFIRMATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        Ok(Self {
            chain_id: env_config.chain_id,
            rpc_url: env_config.rpc_url,
            private_key: env_config.private_key,
            confirmations,
            pipeline: PipelineConfig::from_deployment(deployment)?,
            telegram: TelegramConfig::default(),
        })
    }
}
