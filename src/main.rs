use anyhow::anyhow;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;
use yield_chain::{verify_decimals, AlloyChain};
use yield_core::types::FeeTier;
use yield_core::AppConfig;
use yield_pipeline::{Pipeline, TelegramNotifier};

/// Swap a stablecoin into a second token on Uniswap V3 and supply it to Aave
#[derive(Parser, Debug)]
#[command(name = "stable-yield", version)]
struct Cli {
    /// Amount of the source token to swap, in whole units (`1` = one USDC)
    amount: String,

    /// Uniswap V3 fee tier in hundredths of a basis point (overrides FEE_TIER)
    #[arg(long)]
    fee_tier: Option<u32>,

    /// Minimum swap output in destination-token units (overrides MIN_AMOUNT_OUT)
    #[arg(long)]
    min_amount_out: Option<String>,

    /// Chain id selecting the deployment file (overrides CHAIN_ID)
    #[arg(long)]
    chain_id: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("yield_pipeline=info".parse()?)
                .add_directive("yield_chain=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.chain_id) {
        Ok(config) => {
            info!(
                chain_id = config.chain_id,
                source = %config.pipeline.tokens.source.symbol,
                destination = %config.pipeline.tokens.destination.symbol,
                lending_protocol = %config.pipeline.lending_protocol,
                "Configuration loaded from deployment"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Some(fee) = cli.fee_tier {
        let fee = FeeTier::new(fee).ok_or_else(|| anyhow!("invalid fee tier {}", fee))?;
        config.pipeline.set_fee_tier(fee);
    }
    if let Some(min_out) = cli.min_amount_out.as_deref() {
        config.pipeline.set_min_amount_out(min_out)?;
    }

    let chain = AlloyChain::connect(
        &config.rpc_url,
        config.private_key.expose(),
        config.confirmations,
    )?;

    // Preflight: wrong network or wrong decimals would move the wrong amounts
    let node_chain_id = chain.chain_id().await?;
    if node_chain_id != config.chain_id {
        error!(
            expected = config.chain_id,
            actual = node_chain_id,
            "RPC endpoint serves a different chain"
        );
        std::process::exit(1);
    }

    let mismatches = verify_decimals(&chain, &config.pipeline.tokens).await?;
    if !mismatches.is_empty() {
        for mismatch in &mismatches {
            error!(
                token = %mismatch.token.symbol,
                configured = mismatch.token.decimals,
                on_chain = mismatch.on_chain,
                "Token decimals do not match deployment file"
            );
        }
        std::process::exit(1);
    }

    let pipeline = Pipeline::new(Arc::new(chain), config.pipeline.clone());
    info!(
        amount = %cli.amount,
        fee_tier = %config.pipeline.fee_tier,
        "Starting swap and deposit"
    );

    let report = pipeline.run(&cli.amount).await;

    if let Some(notifier) = TelegramNotifier::from_config(&config.telegram) {
        notifier
            .notify_run(config.chain_id, pipeline.config(), &report)
            .await;
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    info!("Done");
    Ok(())
}
