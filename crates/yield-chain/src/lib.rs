mod client;
mod provider;
mod tokens;

pub use client::{read, submit, ChainReader, ChainSigner, SharedSigner};
pub use provider::AlloyChain;
pub use tokens::{verify_decimals, DecimalsMismatch};
