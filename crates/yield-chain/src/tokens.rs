use yield_core::contracts::IERC20;
use yield_core::types::{TokenDescriptor, TokenRegistry};
use yield_core::Result;

use crate::client::{read, ChainReader};

/// A registry entry whose decimals disagree with the token contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalsMismatch {
    pub token: TokenDescriptor,
    pub on_chain: u8,
}

/// Compare every registry entry against the token's `decimals()`
pub async fn verify_decimals<R>(reader: &R, registry: &TokenRegistry) -> Result<Vec<DecimalsMismatch>>
where
    R: ChainReader + ?Sized,
{
    let mut mismatches = Vec::new();
    for token in registry.iter() {
        let on_chain = read(reader, token.address, IERC20::decimalsCall {}).await?;
        if on_chain != token.decimals {
            mismatches.push(DecimalsMismatch {
                token: token.clone(),
                on_chain,
            });
        }
    }
    Ok(mismatches)
}
