crate::sol! {
    /// Compound III connector.
    ///
    /// `getId`/`setId` read and write the DSA's transient memory slots; zero
    /// disables them. An amount of `type(uint256).max` means "everything":
    /// the full balance on deposit, the full position on withdraw and the
    /// full outstanding borrow on payback.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(abi)]
    interface IConnectV2CompoundV3 {
        function name() external view returns (string memory);

        function deposit(address market, address token, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function depositOnBehalf(address market, address token, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function depositFromUsingManager(address market, address token, address from, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function withdraw(address market, address token, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function withdrawOnBehalf(address market, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function withdrawFromUsingManager(address market, address token, address from, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function borrow(address market, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function borrowOnBehalf(address market, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function borrowFromUsingManager(address market, address from, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function payback(address market, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function paybackOnBehalf(address market, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function paybackFromUsingManager(address market, address from, address to, uint256 amt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function buyCollateral(address market, address asset, address dest, uint256 minCollateralAmt, uint256 baseAmt, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function transferAsset(address market, address token, address dest, uint256 amount, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function transferAssetFromUsingManager(address market, address token, address src, address dest, uint256 amount, uint256 getId, uint256 setId)
            external payable returns (string memory _eventName, bytes memory _eventParam);

        function toggleAccountManager(address market, address manager, bool isAllowed)
            external returns (string memory _eventName, bytes memory _eventParam);
    }
}
