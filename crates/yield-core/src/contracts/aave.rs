use alloy_sol_types::sol;

sol! {
    /// Aave V2 address registry
    #[derive(Debug)]
    interface ILendingPoolAddressesProvider {
        function getLendingPool() external view returns (address);
    }

    /// Aave V2 lending pool
    #[derive(Debug)]
    interface ILendingPool {
        function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
    }

    /// Aave V3 address registry
    #[derive(Debug)]
    interface IPoolAddressesProvider {
        function getPool() external view returns (address);
    }

    /// Aave V3 pool
    #[derive(Debug)]
    interface IPool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
    }
}
