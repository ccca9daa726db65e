pub mod aave;
pub mod erc20;
pub mod uniswap_v3;

pub use aave::*;
pub use erc20::*;
pub use uniswap_v3::*;
