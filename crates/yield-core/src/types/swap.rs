use alloy_primitives::aliases::U160;
use alloy_primitives::{Address, U256};

use super::FeeTier;
use crate::contracts::ISwapRouter;

/// Lower bound applied to the swap output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlippagePolicy {
    /// `amountOutMinimum = 0`: any output amount is accepted
    #[default]
    AcceptAny,
    /// Revert unless at least this many base units of the output token arrive
    MinimumOutput(U256),
}

impl SlippagePolicy {
    pub fn amount_out_minimum(&self) -> U256 {
        match self {
            SlippagePolicy::AcceptAny => U256::ZERO,
            SlippagePolicy::MinimumOutput(min) => *min,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.amount_out_minimum().is_zero()
    }
}

/// A single-hop exact-input swap, built right before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParameters {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: FeeTier,
    pub recipient: Address,
    /// Unix timestamp after which the router rejects the swap
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Always zero: no price limit
    pub sqrt_price_limit_x96: U160,
}

impl SwapParameters {
    pub fn exact_input_single(
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        recipient: Address,
        amount_in: U256,
        slippage: SlippagePolicy,
        deadline: u64,
    ) -> Self {
        Self {
            token_in,
            token_out,
            fee,
            recipient,
            deadline,
            amount_in,
            amount_out_minimum: slippage.amount_out_minimum(),
            sqrt_price_limit_x96: U160::ZERO,
        }
    }

    /// Encode as the router's `exactInputSingle` call
    pub fn to_call(&self) -> ISwapRouter::exactInputSingleCall {
        ISwapRouter::exactInputSingleCall {
            params: ISwapRouter::ExactInputSingleParams {
                tokenIn: self.token_in,
                tokenOut: self.token_out,
                fee: self.fee.as_u24(),
                recipient: self.recipient,
                deadline: U256::from(self.deadline),
                amountIn: self.amount_in,
                amountOutMinimum: self.amount_out_minimum,
                sqrtPriceLimitX96: self.sqrt_price_limit_x96,
            },
        }
    }
}
