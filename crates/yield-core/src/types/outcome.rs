use alloy_primitives::{hex, B256};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Reverted,
}

/// Result of a submitted call once its receipt is available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: B256,
    pub status: TxStatus,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}

/// Block-explorer link for a transaction, e.g. `https://etherscan.io/tx/0x..`
#[derive(Debug, Clone)]
pub struct ExplorerLink {
    base_url: String,
    tx_hash: B256,
}

impl ExplorerLink {
    pub fn new(base_url: &str, tx_hash: B256) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tx_hash,
        }
    }
}

impl fmt::Display for ExplorerLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/tx/{}", self.base_url, hex::encode_prefixed(self.tx_hash))
    }
}
