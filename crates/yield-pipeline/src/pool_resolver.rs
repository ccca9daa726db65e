use alloy_primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};
use yield_chain::{read, ChainReader};
use yield_core::contracts::{IUniswapV3Factory, IUniswapV3Pool};
use yield_core::types::{FeeTier, PoolInfo, PoolKey, TokenDescriptor};
use yield_core::ChainError;

use crate::error::{PipelineError, Result};

/// Finds the Uniswap V3 pool for a pair at a fixed fee tier.
///
/// Results are cached per pair for the lifetime of the resolver; the pool's
/// parameters are immutable so a cached entry never goes stale.
pub struct PoolResolver<R: ?Sized> {
    reader: Arc<R>,
    factory: Address,
    fee: FeeTier,
    cache: DashMap<PoolKey, PoolInfo>,
}

impl<R: ChainReader + ?Sized> PoolResolver<R> {
    pub fn new(reader: Arc<R>, factory: Address, fee: FeeTier) -> Self {
        Self {
            reader,
            factory,
            fee,
            cache: DashMap::new(),
        }
    }

    /// Drop all cached pools
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Resolve the pool for `a`/`b` (order-insensitive)
    pub async fn resolve(&self, a: &TokenDescriptor, b: &TokenDescriptor) -> Result<PoolInfo> {
        let key = PoolKey::new(a.address, b.address, self.fee);
        if let Some(pool) = self.cache.get(&key) {
            debug!(pool = %pool.address, "Pool served from cache");
            return Ok(*pool);
        }

        let lookup_failed = |source: ChainError| PipelineError::PoolLookupFailed {
            token_a: a.address,
            token_b: b.address,
            fee: self.fee,
            source,
        };

        let address = read(
            &*self.reader,
            self.factory,
            IUniswapV3Factory::getPoolCall {
                tokenA: a.address,
                tokenB: b.address,
                fee: self.fee.as_u24(),
            },
        )
        .await
        .map_err(lookup_failed)?;

        if address.is_zero() {
            return Err(PipelineError::PoolNotFound {
                token_a: a.address,
                token_b: b.address,
                fee: self.fee,
            });
        }

        // Immutable fields with no ordering between them
        let (token0, token1, fee) = tokio::try_join!(
            read(&*self.reader, address, IUniswapV3Pool::token0Call {}),
            read(&*self.reader, address, IUniswapV3Pool::token1Call {}),
            read(&*self.reader, address, IUniswapV3Pool::feeCall {}),
        )
        .map_err(lookup_failed)?;

        let pool = PoolInfo {
            address,
            token0,
            token1,
            fee: FeeTier::from_u24(fee),
        };

        if !pool.contains(a.address, b.address) {
            return Err(PipelineError::PoolMismatch {
                pool: address,
                token0,
                token1,
                expected_a: a.address,
                expected_b: b.address,
            });
        }

        info!(
            pool = %pool.address,
            token0 = %pool.token0,
            token1 = %pool.token1,
            fee = %pool.fee,
            pair = format!("{}/{}", a.symbol, b.symbol),
            "Pool resolved"
        );

        self.cache.insert(key, pool);
        Ok(pool)
    }
}
