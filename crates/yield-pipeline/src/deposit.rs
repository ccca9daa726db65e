use alloy_primitives::{Address, U256};
use std::sync::Arc;
use tracing::info;
use yield_chain::{read, submit, ChainSigner};
use yield_core::contracts::{ILendingPool, ILendingPoolAddressesProvider, IPool, IPoolAddressesProvider};
use yield_core::types::{
    format_base_units, ExplorerLink, LendingProtocol, TokenDescriptor, TransactionOutcome,
};

use crate::approval::ApprovalStep;
use crate::error::{DepositStage, PipelineError, Result};

/// Confirmed lending-pool allowance; the only way to reach
/// [`YieldDepositor::deposit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositApproval {
    /// Lending pool contract the registry resolved to
    pub lending_pool: Address,
    pub amount: U256,
    pub outcome: TransactionOutcome,
}

/// Supplies a token balance to Aave on behalf of the signer
pub struct YieldDepositor<S: ?Sized> {
    signer: Arc<S>,
    approvals: ApprovalStep<S>,
    registry: Address,
    protocol: LendingProtocol,
    explorer_url: String,
}

impl<S: ChainSigner + ?Sized> YieldDepositor<S> {
    pub fn new(
        signer: Arc<S>,
        registry: Address,
        protocol: LendingProtocol,
        explorer_url: impl Into<String>,
    ) -> Self {
        let explorer_url = explorer_url.into();
        Self {
            approvals: ApprovalStep::new(signer.clone(), explorer_url.clone()),
            signer,
            registry,
            protocol,
            explorer_url,
        }
    }

    /// Ask the address registry for the active lending pool
    pub async fn resolve_lending_pool(&self) -> Result<Address> {
        let lookup = match self.protocol {
            LendingProtocol::AaveV2 => {
                read(
                    &*self.signer,
                    self.registry,
                    ILendingPoolAddressesProvider::getLendingPoolCall {},
                )
                .await
            }
            LendingProtocol::AaveV3 => {
                read(&*self.signer, self.registry, IPoolAddressesProvider::getPoolCall {}).await
            }
        };

        let lending_pool = lookup.map_err(|source| PipelineError::DepositFailed {
            stage: DepositStage::RegistryLookup,
            source,
        })?;

        if lending_pool.is_zero() {
            return Err(PipelineError::LendingPoolNotFound {
                registry: self.registry,
            });
        }
        Ok(lending_pool)
    }

    /// Resolve the lending pool and approve it for `amount` base units of
    /// `token`. Returns once the allowance is confirmed.
    pub async fn approve(&self, token: &TokenDescriptor, amount: U256) -> Result<DepositApproval> {
        if amount.is_zero() {
            return Err(PipelineError::NothingToDeposit {
                token: token.address,
            });
        }

        let lending_pool = self.resolve_lending_pool().await?;
        info!(
            protocol = %self.protocol,
            lending_pool = %lending_pool,
            token = %token.symbol,
            amount = %format_base_units(amount, token.decimals),
            "Approving lending pool"
        );

        let outcome = self
            .approvals
            .grant(token, lending_pool, amount)
            .await
            .map_err(|source| PipelineError::DepositFailed {
                stage: DepositStage::Approval,
                source,
            })?;

        Ok(DepositApproval {
            lending_pool,
            amount,
            outcome,
        })
    }

    /// Deposit the approved amount with the signer as beneficiary
    pub async fn deposit(
        &self,
        token: &TokenDescriptor,
        approval: &DepositApproval,
    ) -> Result<TransactionOutcome> {
        let on_behalf_of = self.signer.address();
        let submitted = match self.protocol {
            LendingProtocol::AaveV2 => {
                let call = ILendingPool::depositCall {
                    asset: token.address,
                    amount: approval.amount,
                    onBehalfOf: on_behalf_of,
                    referralCode: 0,
                };
                submit(&*self.signer, approval.lending_pool, call).await
            }
            LendingProtocol::AaveV3 => {
                let call = IPool::supplyCall {
                    asset: token.address,
                    amount: approval.amount,
                    onBehalfOf: on_behalf_of,
                    referralCode: 0,
                };
                submit(&*self.signer, approval.lending_pool, call).await
            }
        };

        let outcome = submitted.map_err(|source| PipelineError::DepositFailed {
            stage: DepositStage::Deposit,
            source,
        })?;

        info!(
            token = %token.symbol,
            tx = %ExplorerLink::new(&self.explorer_url, outcome.tx_hash),
            "Deposit confirmed"
        );
        Ok(outcome)
    }
}
