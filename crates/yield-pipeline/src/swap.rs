use alloy_primitives::{Address, U256};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use yield_chain::{submit, ChainSigner};
use yield_core::types::{
    ExplorerLink, PoolInfo, SlippagePolicy, SwapParameters, TokenDescriptor, TransactionOutcome,
};

use crate::error::{PipelineError, Result};

/// Unix timestamp `secs` seconds from now
pub fn deadline_from_now(secs: u64) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .saturating_add(secs)
}

/// Submits single-hop exact-input swaps to the Uniswap V3 router
pub struct SwapExecutor<S: ?Sized> {
    signer: Arc<S>,
    router: Address,
    explorer_url: String,
}

impl<S: ChainSigner + ?Sized> SwapExecutor<S> {
    pub fn new(signer: Arc<S>, router: Address, explorer_url: impl Into<String>) -> Self {
        Self {
            signer,
            router,
            explorer_url: explorer_url.into(),
        }
    }

    /// Build the swap for a resolved pool, paying out to the signer.
    ///
    /// The fee comes from the pool itself rather than from configuration.
    pub fn build_params(
        &self,
        pool: &PoolInfo,
        token_in: &TokenDescriptor,
        token_out: &TokenDescriptor,
        amount_in: U256,
        slippage: SlippagePolicy,
        deadline: u64,
    ) -> SwapParameters {
        SwapParameters::exact_input_single(
            token_in.address,
            token_out.address,
            pool.fee,
            self.signer.address(),
            amount_in,
            slippage,
            deadline,
        )
    }

    /// Submit the swap and wait for confirmation
    pub async fn execute(&self, params: &SwapParameters) -> Result<TransactionOutcome> {
        info!(
            token_in = %params.token_in,
            token_out = %params.token_out,
            fee = %params.fee,
            amount_in = %params.amount_in,
            amount_out_minimum = %params.amount_out_minimum,
            "Submitting swap"
        );

        let outcome = submit(&*self.signer, self.router, params.to_call())
            .await
            .map_err(|source| PipelineError::SwapFailed { source })?;

        info!(
            tx = %ExplorerLink::new(&self.explorer_url, outcome.tx_hash),
            "Swap confirmed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{link, pool_address, router, sender, usdc, MockChain};
    use alloy_primitives::aliases::U160;
    use alloy_sol_types::SolCall;
    use yield_core::contracts::ISwapRouter;
    use yield_core::types::FeeTier;
    use yield_core::ChainError;

    fn pool() -> PoolInfo {
        PoolInfo {
            address: pool_address(),
            token0: usdc().address,
            token1: link().address,
            fee: FeeTier::MEDIUM,
        }
    }

    fn executor(chain: &Arc<MockChain>) -> SwapExecutor<MockChain> {
        SwapExecutor::new(chain.clone(), router(), "https://sepolia.etherscan.io")
    }

    #[test]
    fn test_params_use_pool_fee_and_signer_recipient() {
        let chain = Arc::new(MockChain::new(U256::ZERO));
        let pool = PoolInfo {
            fee: FeeTier::LOW,
            ..pool()
        };
        let params = executor(&chain).build_params(
            &pool,
            &usdc(),
            &link(),
            U256::from(1_000_000u64),
            SlippagePolicy::AcceptAny,
            1_700_000_000,
        );

        assert_eq!(params.fee, FeeTier::LOW);
        assert_eq!(params.recipient, sender());
        assert_eq!(params.token_in, usdc().address);
        assert_eq!(params.token_out, link().address);
        assert_eq!(params.amount_out_minimum, U256::ZERO);
    }

    #[tokio::test]
    async fn test_execute_submits_exact_input_single() {
        let chain = Arc::new(MockChain::new(U256::from(7u64)));
        let executor = executor(&chain);
        let params = executor.build_params(
            &pool(),
            &usdc(),
            &link(),
            U256::from(1_000_000u64),
            SlippagePolicy::MinimumOutput(U256::from(5u64)),
            deadline_from_now(600),
        );

        let outcome = executor.execute(&params).await.unwrap();
        assert!(outcome.is_success());

        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, router());
        let call = ISwapRouter::exactInputSingleCall::abi_decode(&sent[0].1).unwrap();
        assert_eq!(call.params.amountIn, U256::from(1_000_000u64));
        assert_eq!(call.params.amountOutMinimum, U256::from(5u64));
        assert_eq!(call.params.sqrtPriceLimitX96, U160::ZERO);
        assert_eq!(call.params.recipient, sender());
    }

    #[tokio::test]
    async fn test_router_rejection_is_swap_failure() {
        let chain = Arc::new(
            MockChain::new(U256::ZERO).revert_on(ISwapRouter::exactInputSingleCall::SELECTOR),
        );
        let executor = executor(&chain);
        let params = executor.build_params(
            &pool(),
            &usdc(),
            &link(),
            U256::from(1u64),
            SlippagePolicy::AcceptAny,
            deadline_from_now(600),
        );

        let err = executor.execute(&params).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SwapFailed {
                source: ChainError::Reverted { .. }
            }
        ));
    }

    #[test]
    fn test_deadline_is_in_the_future() {
        let now = deadline_from_now(0);
        assert!(deadline_from_now(600) >= now + 600);
    }
}
