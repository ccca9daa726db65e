mod amount;
mod lending;
mod outcome;
mod pool;
mod swap;
mod token;

pub use amount::{format_base_units, AmountError, AmountSpec};
pub use lending::LendingProtocol;
pub use outcome::{ExplorerLink, TransactionOutcome, TxStatus};
pub use pool::{FeeTier, PoolInfo, PoolKey};
pub use swap::{SlippagePolicy, SwapParameters};
pub use token::{TokenDescriptor, TokenRegistry};
