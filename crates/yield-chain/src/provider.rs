use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use tracing::info;
use yield_core::types::{TransactionOutcome, TxStatus};
use yield_core::{ChainError, Result};

use crate::client::{ChainReader, ChainSigner};

/// HTTP provider with a local private-key wallet attached
pub struct AlloyChain {
    provider: DynProvider,
    sender: Address,
    confirmations: u64,
}

impl AlloyChain {
    /// Connect to `rpc_url` and sign with `private_key`
    pub fn connect(rpc_url: &str, private_key: &str, confirmations: u64) -> Result<Self> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::InvalidUrl(format!("{}: {}", rpc_url, e)))?;

        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ChainError::Signer(format!("Invalid private key: {}", e)))?;
        let sender = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        info!(sender = %sender, confirmations, "Chain client ready");

        Ok(Self {
            provider,
            sender,
            confirmations: confirmations.max(1),
        })
    }

    /// Chain id reported by the node
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }
}

fn rpc_error(e: impl std::fmt::Display) -> ChainError {
    ChainError::Rpc(e.to_string())
}

#[async_trait]
impl ChainReader for AlloyChain {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        self.provider.call(tx).await.map_err(rpc_error)
    }
}

#[async_trait]
impl ChainSigner for AlloyChain {
    fn address(&self) -> Address {
        self.sender
    }

    async fn send(&self, to: Address, input: Bytes) -> Result<B256> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(input);
        let pending = self.provider.send_transaction(tx).await.map_err(rpc_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionOutcome> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(rpc_error)?;

        let status = if receipt.status() {
            TxStatus::Confirmed
        } else {
            TxStatus::Reverted
        };

        Ok(TransactionOutcome {
            tx_hash,
            status,
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
        })
    }
}
