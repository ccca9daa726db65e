use serde::Deserialize;
use std::fmt;

/// Which Aave deployment the address registry belongs to.
///
/// V2 exposes `getLendingPool()` / `deposit(..)`, V3 exposes
/// `getPool()` / `supply(..)`; the call shapes are otherwise identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum LendingProtocol {
    #[default]
    #[serde(rename = "aave-v2")]
    AaveV2,
    #[serde(rename = "aave-v3")]
    AaveV3,
}

impl fmt::Display for LendingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LendingProtocol::AaveV2 => write!(f, "aave-v2"),
            LendingProtocol::AaveV3 => write!(f, "aave-v3"),
        }
    }
}
