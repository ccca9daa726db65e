use alloy_primitives::{Address, U256};
use std::sync::Arc;
use tracing::info;
use yield_chain::{submit, ChainSigner};
use yield_core::contracts::IERC20;
use yield_core::types::{
    AmountError, AmountSpec, ExplorerLink, TokenDescriptor, TransactionOutcome,
};

use crate::error::{PipelineError, Result};

/// Grants a spender an ERC-20 allowance and waits for it to land
pub struct ApprovalStep<S: ?Sized> {
    signer: Arc<S>,
    explorer_url: String,
}

impl<S: ChainSigner + ?Sized> ApprovalStep<S> {
    pub fn new(signer: Arc<S>, explorer_url: impl Into<String>) -> Self {
        Self {
            signer,
            explorer_url: explorer_url.into(),
        }
    }

    /// Allow `spender` to move up to `amount` of `token` from the signer.
    ///
    /// `amount` must have been parsed against `token`. Returns only once the
    /// approval is confirmed.
    pub async fn approve(
        &self,
        token: &TokenDescriptor,
        spender: Address,
        amount: &AmountSpec,
    ) -> Result<TransactionOutcome> {
        if amount.decimals() != token.decimals {
            return Err(AmountError::DecimalsMismatch {
                token: token.symbol.clone(),
                expected: token.decimals,
                actual: amount.decimals(),
            }
            .into());
        }

        info!(
            token = %token.symbol,
            spender = %spender,
            amount = %amount,
            "Submitting approval"
        );

        self.grant(token, spender, amount.base_units())
            .await
            .map_err(|source| PipelineError::ApprovalFailed {
                token: token.address,
                spender,
                source,
            })
    }

    /// Same as [`ApprovalStep::approve`] for an amount already in base units,
    /// leaving the error classification to the caller.
    pub(crate) async fn grant(
        &self,
        token: &TokenDescriptor,
        spender: Address,
        amount: U256,
    ) -> yield_core::Result<TransactionOutcome> {
        let call = IERC20::approveCall { spender, amount };
        let outcome = submit(&*self.signer, token.address, call).await?;

        info!(
            token = %token.symbol,
            spender = %spender,
            tx = %ExplorerLink::new(&self.explorer_url, outcome.tx_hash),
            "Approval confirmed"
        );
        Ok(outcome)
    }
}
