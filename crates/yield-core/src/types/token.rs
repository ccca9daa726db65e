use alloy_primitives::Address;
use serde::Deserialize;

/// An ERC-20 asset the pipeline manipulates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenDescriptor {
    /// Ticker used in logs, e.g. `USDC`
    pub symbol: String,
    /// Token contract address
    pub address: Address,
    /// Decimal precision used to scale human amounts to base units
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }
}

/// The fixed set of tokens a run touches, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRegistry {
    /// Token spent by the swap (the stablecoin)
    pub source: TokenDescriptor,
    /// Token acquired by the swap and supplied to the lending protocol
    pub destination: TokenDescriptor,
}

impl TokenRegistry {
    pub fn new(source: TokenDescriptor, destination: TokenDescriptor) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenDescriptor> {
        [&self.source, &self.destination].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TokenRegistry {
        TokenRegistry::new(
            TokenDescriptor::new("USDC", Address::repeat_byte(0x01), 6),
            TokenDescriptor::new("LINK", Address::repeat_byte(0x02), 18),
        )
    }

    #[test]
    fn test_iter_yields_source_then_destination() {
        let reg = registry();
        let symbols: Vec<_> = reg.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["USDC", "LINK"]);
    }
}
