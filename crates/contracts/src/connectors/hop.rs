crate::sol! {
    /// Hop connector: sends tokens from an L2 through the Hop AMM wrapper.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(abi)]
    interface IConnectV2Hop {
        struct BridgeParams {
            address token;
            address hopRouter;
            address recipient;
            uint256 targetChainId;
            uint256 amount;
            uint256 bonderFee;
            uint256 sourceAmountOutMin;
            uint256 sourceDeadline;
            uint256 destinationAmountOutMin;
            uint256 destinationDeadline;
        }

        function name() external view returns (string memory);

        function bridge(BridgeParams memory params, uint256 getId)
            external payable returns (string memory _eventName, bytes memory _eventParam);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    #[test]
    fn bridge_takes_params_tuple() {
        assert_eq!(
            IConnectV2Hop::bridgeCall::SIGNATURE,
            "bridge((address,address,address,uint256,uint256,uint256,uint256,uint256,uint256,uint256),uint256)"
        );
    }
}
