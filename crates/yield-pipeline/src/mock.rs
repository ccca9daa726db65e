//! Scripted in-memory chain used by the pipeline tests.
//!
//! Every read, send and confirmation is recorded in order so tests can assert
//! on sequencing, not only on results.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use yield_core::contracts::{
    ILendingPoolAddressesProvider, IPoolAddressesProvider, ISwapRouter, IUniswapV3Factory,
    IUniswapV3Pool, IERC20,
};
use yield_core::types::{
    FeeTier, LendingProtocol, PoolKey, SlippagePolicy, TokenDescriptor, TokenRegistry,
    TransactionOutcome, TxStatus,
};
use yield_core::{ChainError, PipelineConfig, Result};
use yield_chain::{ChainReader, ChainSigner};

pub(crate) fn sender() -> Address {
    Address::repeat_byte(0xaa)
}

pub(crate) fn factory() -> Address {
    Address::repeat_byte(0xf0)
}

pub(crate) fn router() -> Address {
    Address::repeat_byte(0xf1)
}

pub(crate) fn registry() -> Address {
    Address::repeat_byte(0xf2)
}

pub(crate) fn lending_pool() -> Address {
    Address::repeat_byte(0xf3)
}

pub(crate) fn pool_address() -> Address {
    Address::repeat_byte(0xee)
}

pub(crate) fn usdc() -> TokenDescriptor {
    TokenDescriptor::new("USDC", Address::repeat_byte(0x01), 6)
}

pub(crate) fn link() -> TokenDescriptor {
    TokenDescriptor::new("LINK", Address::repeat_byte(0x02), 18)
}

pub(crate) fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        tokens: TokenRegistry::new(usdc(), link()),
        factory: factory(),
        router: router(),
        lending_addresses_provider: registry(),
        lending_protocol: LendingProtocol::AaveV2,
        fee_tier: FeeTier::MEDIUM,
        slippage: SlippagePolicy::AcceptAny,
        swap_deadline_secs: 600,
        explorer_url: "https://sepolia.etherscan.io".to_string(),
    }
}

/// Something the pipeline did against the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChainEvent {
    Read { to: Address, selector: [u8; 4] },
    Send { to: Address, selector: [u8; 4], tx_hash: B256 },
    Confirm { tx_hash: B256, selector: [u8; 4] },
}

struct PendingTx {
    to: Address,
    input: Bytes,
}

pub(crate) struct MockChain {
    sender: Address,
    pools: HashMap<PoolKey, Address>,
    pool_params: HashMap<Address, (Address, Address, FeeTier)>,
    lending_pool: Address,
    swap_output: U256,
    balances: Mutex<HashMap<(Address, Address), U256>>,
    fail_read: Option<[u8; 4]>,
    fail_send: Option<[u8; 4]>,
    fail_confirm: Option<[u8; 4]>,
    revert: Option<[u8; 4]>,
    pending: Mutex<HashMap<B256, PendingTx>>,
    events: Mutex<Vec<ChainEvent>>,
}

impl MockChain {
    /// Chain with a USDC/LINK 0.3% pool, an Aave registry and a swap that
    /// pays out `swap_output` LINK base units.
    pub(crate) fn new(swap_output: U256) -> Self {
        let (token0, token1) = (usdc().address, link().address);
        Self {
            sender: sender(),
            pools: HashMap::from([(PoolKey::new(token0, token1, FeeTier::MEDIUM), pool_address())]),
            pool_params: HashMap::from([(pool_address(), (token0, token1, FeeTier::MEDIUM))]),
            lending_pool: lending_pool(),
            swap_output,
            balances: Mutex::new(HashMap::new()),
            fail_read: None,
            fail_send: None,
            fail_confirm: None,
            revert: None,
            pending: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_pools(mut self) -> Self {
        self.pools.clear();
        self
    }

    /// Make the pool at `pool_address()` report different constituents
    pub(crate) fn with_pool_tokens(mut self, token0: Address, token1: Address) -> Self {
        self.pool_params
            .insert(pool_address(), (token0, token1, FeeTier::MEDIUM));
        self
    }

    pub(crate) fn with_lending_pool(mut self, lending_pool: Address) -> Self {
        self.lending_pool = lending_pool;
        self
    }

    pub(crate) fn fail_read_of(mut self, selector: [u8; 4]) -> Self {
        self.fail_read = Some(selector);
        self
    }

    pub(crate) fn fail_send_of(mut self, selector: [u8; 4]) -> Self {
        self.fail_send = Some(selector);
        self
    }

    pub(crate) fn fail_confirmation_of(mut self, selector: [u8; 4]) -> Self {
        self.fail_confirm = Some(selector);
        self
    }

    pub(crate) fn revert_on(mut self, selector: [u8; 4]) -> Self {
        self.revert = Some(selector);
        self
    }

    pub(crate) fn events(&self) -> Vec<ChainEvent> {
        self.events.lock().clone()
    }

    /// Decoded inputs of every sent transaction, in order
    pub(crate) fn sent(&self) -> Vec<(Address, Bytes)> {
        let pending = self.pending.lock();
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Send { tx_hash, .. } => pending
                    .get(&tx_hash)
                    .map(|tx| (tx.to, tx.input.clone())),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn sent_selectors(&self) -> Vec<[u8; 4]> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Send { selector, .. } => Some(selector),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn reads_of(&self, selector: [u8; 4]) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ChainEvent::Read { selector: s, .. } if *s == selector))
            .count()
    }

    /// Index of the first event matching `predicate`
    pub(crate) fn position(&self, predicate: impl Fn(&ChainEvent) -> bool) -> Option<usize> {
        self.events().iter().position(predicate)
    }

    fn record(&self, event: ChainEvent) {
        self.events.lock().push(event);
    }

    fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .lock()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }
}

fn selector_of(input: &[u8]) -> [u8; 4] {
    let mut selector = [0u8; 4];
    if input.len() >= 4 {
        selector.copy_from_slice(&input[..4]);
    }
    selector
}

fn decode<C: SolCall>(input: &[u8]) -> Result<C> {
    C::abi_decode(input).map_err(|e| ChainError::Decode(e.to_string()))
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let selector = selector_of(&input);
        self.record(ChainEvent::Read { to, selector });
        if self.fail_read == Some(selector) {
            return Err(ChainError::Rpc("request timed out".to_string()));
        }

        let encoded = if selector == IUniswapV3Factory::getPoolCall::SELECTOR {
            let call = decode::<IUniswapV3Factory::getPoolCall>(&input)?;
            let key = PoolKey::new(call.tokenA, call.tokenB, FeeTier::from_u24(call.fee));
            self.pools.get(&key).copied().unwrap_or_default().abi_encode()
        } else if selector == IUniswapV3Pool::token0Call::SELECTOR
            || selector == IUniswapV3Pool::token1Call::SELECTOR
            || selector == IUniswapV3Pool::feeCall::SELECTOR
        {
            let (token0, token1, fee) = self
                .pool_params
                .get(&to)
                .copied()
                .ok_or_else(|| ChainError::Rpc(format!("no contract at {}", to)))?;
            if selector == IUniswapV3Pool::token0Call::SELECTOR {
                token0.abi_encode()
            } else if selector == IUniswapV3Pool::token1Call::SELECTOR {
                token1.abi_encode()
            } else {
                U256::from(fee.get()).abi_encode()
            }
        } else if selector == IERC20::balanceOfCall::SELECTOR {
            let call = decode::<IERC20::balanceOfCall>(&input)?;
            self.balance(to, call.account).abi_encode()
        } else if selector == ILendingPoolAddressesProvider::getLendingPoolCall::SELECTOR
            || selector == IPoolAddressesProvider::getPoolCall::SELECTOR
        {
            self.lending_pool.abi_encode()
        } else {
            return Err(ChainError::Rpc(format!("unexpected call to {}", to)));
        };

        Ok(Bytes::from(encoded))
    }
}

#[async_trait]
impl ChainSigner for MockChain {
    fn address(&self) -> Address {
        self.sender
    }

    async fn send(&self, to: Address, input: Bytes) -> Result<B256> {
        let selector = selector_of(&input);
        if self.fail_send == Some(selector) {
            return Err(ChainError::Rpc("nonce too low".to_string()));
        }

        let mut pending = self.pending.lock();
        let tx_hash = B256::left_padding_from(&(pending.len() as u64 + 1).to_be_bytes());
        pending.insert(tx_hash, PendingTx { to, input });
        drop(pending);

        self.record(ChainEvent::Send {
            to,
            selector,
            tx_hash,
        });
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionOutcome> {
        let (selector, input) = {
            let pending = self.pending.lock();
            let tx = pending
                .get(&tx_hash)
                .ok_or_else(|| ChainError::Rpc(format!("unknown transaction {}", tx_hash)))?;
            (selector_of(&tx.input), tx.input.clone())
        };
        self.record(ChainEvent::Confirm { tx_hash, selector });

        if self.fail_confirm == Some(selector) {
            return Err(ChainError::Rpc("connection reset by peer".to_string()));
        }
        if self.revert == Some(selector) {
            return Ok(TransactionOutcome {
                tx_hash,
                status: TxStatus::Reverted,
                block_number: Some(100),
                gas_used: 21_000,
            });
        }

        if selector == ISwapRouter::exactInputSingleCall::SELECTOR {
            let call = decode::<ISwapRouter::exactInputSingleCall>(&input)?;
            let mut balances = self.balances.lock();
            let balance = balances
                .entry((call.params.tokenOut, call.params.recipient))
                .or_default();
            *balance += self.swap_output;
        }

        Ok(TransactionOutcome {
            tx_hash,
            status: TxStatus::Confirmed,
            block_number: Some(100),
            gas_used: 50_000,
        })
    }
}
