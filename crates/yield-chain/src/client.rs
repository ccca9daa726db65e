//! Chain capabilities consumed by the pipeline.
//!
//! Read access and sign-and-submit access are separate traits so that each
//! step only asks for what it uses. Calls travel as ABI-encoded bytes; the
//! typed helpers below do the encoding with the `sol!` bindings.

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use yield_core::types::TransactionOutcome;
use yield_core::{ChainError, Result};

/// Read-only access to contract state
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute `eth_call` against `to` with ABI-encoded `input`
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;
}

/// Signing identity able to submit transactions and wait for them
#[async_trait]
pub trait ChainSigner: ChainReader {
    /// Address of the signing identity
    fn address(&self) -> Address;

    /// Sign and broadcast a call, returning its transaction hash
    async fn send(&self, to: Address, input: Bytes) -> Result<B256>;

    /// Block until the transaction's receipt is available
    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionOutcome>;
}

/// Signer shared by every step of a run
pub type SharedSigner = Arc<dyn ChainSigner>;

/// Perform a typed read-only call
pub async fn read<R, C>(reader: &R, to: Address, call: C) -> Result<C::Return>
where
    R: ChainReader + ?Sized,
    C: SolCall,
{
    let raw = reader.call(to, Bytes::from(call.abi_encode())).await?;
    C::abi_decode_returns(&raw).map_err(|e| ChainError::Decode(format!("{}: {}", C::SIGNATURE, e)))
}

/// Submit a typed call and wait for it to be confirmed.
///
/// A receipt with a failed status is reported as [`ChainError::Reverted`].
pub async fn submit<S, C>(signer: &S, to: Address, call: C) -> Result<TransactionOutcome>
where
    S: ChainSigner + ?Sized,
    C: SolCall,
{
    let tx_hash = signer.send(to, Bytes::from(call.abi_encode())).await?;
    debug!(tx_hash = %tx_hash, function = C::SIGNATURE, to = %to, "Transaction submitted");

    let outcome = signer.wait_for_confirmation(tx_hash).await?;
    if !outcome.is_success() {
        return Err(ChainError::Reverted { tx_hash });
    }

    debug!(
        tx_hash = %tx_hash,
        block = ?outcome.block_number,
        gas_used = outcome.gas_used,
        "Transaction confirmed"
    );
    Ok(outcome)
}
