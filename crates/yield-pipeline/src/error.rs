use alloy_primitives::Address;
use std::fmt;
use thiserror::Error;
use yield_core::types::{AmountError, FeeTier};
use yield_core::ChainError;

use crate::state::RunPhase;

/// Which part of the deposit sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositStage {
    RegistryLookup,
    Approval,
    Deposit,
}

impl fmt::Display for DepositStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepositStage::RegistryLookup => write!(f, "lending pool lookup"),
            DepositStage::Approval => write!(f, "lending pool approval"),
            DepositStage::Deposit => write!(f, "deposit"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid swap amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Approval of {token} for spender {spender} failed: {source}")]
    ApprovalFailed {
        token: Address,
        spender: Address,
        source: ChainError,
    },

    #[error("Pool lookup for {token_a}/{token_b} at fee {fee} failed: {source}")]
    PoolLookupFailed {
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        source: ChainError,
    },

    #[error("No pool exists for {token_a}/{token_b} at fee {fee}")]
    PoolNotFound {
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    },

    #[error("Pool {pool} holds {token0}/{token1}, expected {expected_a}/{expected_b}")]
    PoolMismatch {
        pool: Address,
        token0: Address,
        token1: Address,
        expected_a: Address,
        expected_b: Address,
    },

    #[error("Swap failed: {source}")]
    SwapFailed { source: ChainError },

    #[error("Reading balance of {token} failed: {source}")]
    BalanceReadFailed { token: Address, source: ChainError },

    #[error("Nothing to deposit: balance of {token} is zero")]
    NothingToDeposit { token: Address },

    #[error("Lending registry {registry} returned no pool")]
    LendingPoolNotFound { registry: Address },

    #[error("Deposit failed during {stage}: {source}")]
    DepositFailed {
        stage: DepositStage,
        source: ChainError,
    },
}

impl PipelineError {
    /// Phase the run was in when this error was raised
    pub fn phase(&self) -> RunPhase {
        match self {
            PipelineError::InvalidAmount(_) => RunPhase::Start,
            PipelineError::ApprovalFailed { .. } => RunPhase::Approving,
            PipelineError::PoolLookupFailed { .. }
            | PipelineError::PoolNotFound { .. }
            | PipelineError::PoolMismatch { .. } => RunPhase::PoolResolving,
            PipelineError::SwapFailed { .. } => RunPhase::Swapping,
            PipelineError::BalanceReadFailed { .. } => RunPhase::BalanceReading,
            PipelineError::NothingToDeposit { .. }
            | PipelineError::LendingPoolNotFound { .. }
            | PipelineError::DepositFailed { .. } => RunPhase::Depositing,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
