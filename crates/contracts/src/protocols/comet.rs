crate::sol! {
    /// Compound III market (Comet). Read side used for position assertions.
    #[derive(Debug, PartialEq, Eq)]
    interface IComet {
        struct UserBasic {
            int104 principal;
            uint64 baseTrackingIndex;
            uint64 baseTrackingAccrued;
            uint16 assetsIn;
            uint8 _reserved;
        }

        struct UserCollateral {
            uint128 balance;
            uint128 _reserved;
        }

        /// Supplied base balance, including accrued interest.
        function balanceOf(address account) external view returns (uint256);

        /// Outstanding base borrow, including accrued interest.
        function borrowBalanceOf(address account) external view returns (uint256);

        function baseBorrowMin() external view returns (uint256);
        function baseMinForRewards() external view returns (uint256);
        function baseToken() external view returns (address);
        function decimals() external view returns (uint8);
        function getPrice(address priceFeed) external view returns (uint256);

        /// Whether `manager` may act on `owner`'s position.
        function hasPermission(address owner, address manager) external view returns (bool);

        function numAssets() external view returns (uint8);
        function quoteCollateral(address asset, uint256 baseAmount) external view returns (uint256);
        function userBasic(address account) external view returns (UserBasic memory);
        function userCollateral(address account, address asset) external view returns (UserCollateral memory);

        function allow(address manager, bool isAllowed) external;
    }
}
