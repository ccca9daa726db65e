use alloy_primitives::U256;
use std::sync::Arc;
use tracing::{error, info, warn};
use yield_chain::{read, ChainSigner};
use yield_core::contracts::IERC20;
use yield_core::types::{format_base_units, AmountSpec, PoolInfo, TransactionOutcome};
use yield_core::PipelineConfig;

use crate::approval::ApprovalStep;
use crate::deposit::{DepositApproval, YieldDepositor};
use crate::error::{PipelineError, Result};
use crate::pool_resolver::PoolResolver;
use crate::state::{RunPhase, RunState};
use crate::swap::{deadline_from_now, SwapExecutor};

/// Everything a run produced, successful or not
#[derive(Debug, Default)]
pub struct RunReport {
    pub state: RunState,
    pub amount_in: Option<AmountSpec>,
    pub approval: Option<TransactionOutcome>,
    pub pool: Option<PoolInfo>,
    pub swap: Option<TransactionOutcome>,
    /// Destination-token balance read after the swap, in base units
    pub swapped_balance: Option<U256>,
    pub deposit_approval: Option<DepositApproval>,
    pub deposit: Option<TransactionOutcome>,
    pub error: Option<PipelineError>,
}

impl RunReport {
    pub fn phase(&self) -> RunPhase {
        self.state.phase()
    }

    pub fn is_success(&self) -> bool {
        self.phase() == RunPhase::Done
    }

    /// Confirmed transactions in submission order
    pub fn transactions(&self) -> Vec<&TransactionOutcome> {
        self.approval
            .iter()
            .chain(self.swap.iter())
            .chain(self.deposit_approval.iter().map(|a| &a.outcome))
            .chain(self.deposit.iter())
            .collect()
    }

    /// Failed after at least one transaction was confirmed; funds moved by
    /// those transactions stay where they are.
    pub fn is_partial(&self) -> bool {
        self.phase() == RunPhase::Failed && !self.transactions().is_empty()
    }

    fn enter(&mut self, phase: RunPhase) {
        if !self.state.advance(phase) {
            warn!(from = %self.state.phase(), to = %phase, "Ignoring invalid phase transition");
        }
    }
}

/// Runs approve → resolve pool → swap → read balance → deposit, in order.
///
/// This is the only place errors are handled: any step failure ends the run
/// in `Failed`, with no retry and no rollback of confirmed steps.
pub struct Pipeline<S: ?Sized> {
    signer: Arc<S>,
    config: PipelineConfig,
    approval: ApprovalStep<S>,
    resolver: PoolResolver<S>,
    swapper: SwapExecutor<S>,
    depositor: YieldDepositor<S>,
}

impl<S: ChainSigner + ?Sized> Pipeline<S> {
    pub fn new(signer: Arc<S>, config: PipelineConfig) -> Self {
        let explorer = config.explorer_url.clone();
        Self {
            approval: ApprovalStep::new(signer.clone(), explorer.clone()),
            resolver: PoolResolver::new(signer.clone(), config.factory, config.fee_tier),
            swapper: SwapExecutor::new(signer.clone(), config.router, explorer.clone()),
            depositor: YieldDepositor::new(
                signer.clone(),
                config.lending_addresses_provider,
                config.lending_protocol,
                explorer,
            ),
            signer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole sequence for `amount` human units of the source token
    pub async fn run(&self, amount: &str) -> RunReport {
        // Pools are discovered per run
        self.resolver.clear();

        let mut report = RunReport::default();
        match self.execute(amount, &mut report).await {
            Ok(()) => {
                report.enter(RunPhase::Done);
                info!(
                    transactions = report.transactions().len(),
                    "Pipeline complete"
                );
            }
            Err(e) => {
                error!(
                    phase = %e.phase(),
                    error = %e,
                    confirmed_transactions = report.transactions().len(),
                    "Pipeline failed"
                );
                report.state.fail();
                report.error = Some(e);
            }
        }
        report
    }

    async fn execute(&self, amount: &str, report: &mut RunReport) -> Result<()> {
        let tokens = &self.config.tokens;
        let amount = AmountSpec::parse(amount, &tokens.source)?;
        report.amount_in = Some(amount.clone());

        report.enter(RunPhase::Approving);
        let approval = self
            .approval
            .approve(&tokens.source, self.config.router, &amount)
            .await?;
        report.approval = Some(approval);

        report.enter(RunPhase::PoolResolving);
        let pool = self.resolver.resolve(&tokens.source, &tokens.destination).await?;
        report.pool = Some(pool);

        report.enter(RunPhase::Swapping);
        if self.config.slippage.is_unbounded() {
            warn!("amountOutMinimum is zero: the swap accepts any output amount");
        }
        let params = self.swapper.build_params(
            &pool,
            &tokens.source,
            &tokens.destination,
            amount.base_units(),
            self.config.slippage,
            deadline_from_now(self.config.swap_deadline_secs),
        );
        let swap = self.swapper.execute(&params).await?;
        report.swap = Some(swap);

        report.enter(RunPhase::BalanceReading);
        let owner = self.signer.address();
        let balance = read(
            &*self.signer,
            tokens.destination.address,
            IERC20::balanceOfCall { account: owner },
        )
        .await
        .map_err(|source| PipelineError::BalanceReadFailed {
            token: tokens.destination.address,
            source,
        })?;
        report.swapped_balance = Some(balance);
        info!(
            token = %tokens.destination.symbol,
            balance = %format_base_units(balance, tokens.destination.decimals),
            "Balance after swap"
        );

        report.enter(RunPhase::Depositing);
        let deposit_approval = self.depositor.approve(&tokens.destination, balance).await?;
        let deposit = self
            .depositor
            .deposit(&tokens.destination, &deposit_approval)
            .await;
        report.deposit_approval = Some(deposit_approval);
        report.deposit = Some(deposit?);

        Ok(())
    }
}
