use alloy_sol_types::sol;

sol! {
    /// Subset of the ERC-20 interface used by the pipeline
    #[derive(Debug)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
