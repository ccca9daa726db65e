use alloy_primitives::aliases::U24;
use alloy_primitives::Address;
use serde::Deserialize;
use std::fmt;

/// Uniswap V3 fee tier in hundredths of a basis point (3000 = 0.3%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(u32);

impl FeeTier {
    pub const LOW: FeeTier = FeeTier(500);
    pub const MEDIUM: FeeTier = FeeTier(3000);
    pub const HIGH: FeeTier = FeeTier(10_000);

    /// Largest value representable by the on-chain `uint24`
    const MAX: u32 = (1 << 24) - 1;

    pub fn new(fee: u32) -> Option<Self> {
        (fee <= Self::MAX).then_some(Self(fee))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_u24(&self) -> U24 {
        U24::from(self.0)
    }

    pub fn from_u24(fee: U24) -> Self {
        Self(fee.to::<u32>())
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cache key for a pool: the pair in canonical (sorted) order plus the fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
    pub fee: FeeTier,
}

impl PoolKey {
    pub fn new(a: Address, b: Address, fee: FeeTier) -> Self {
        let (token0, token1) = if a <= b { (a, b) } else { (b, a) };
        Self {
            token0,
            token1,
            fee,
        }
    }
}

/// A discovered exchange pool and its immutable parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    /// Pool contract address
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    /// Fee tier as reported by the pool itself
    pub fee: FeeTier,
}

impl PoolInfo {
    /// True when the pool's constituents are exactly `{a, b}` in either order
    pub fn contains(&self, a: Address, b: Address) -> bool {
        (self.token0 == a && self.token1 == b) || (self.token0 == b && self.token1 == a)
    }
}
