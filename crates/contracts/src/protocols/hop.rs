crate::sol! {
    /// Hop L2 bridge. Emits one `TransferSent` per outbound transfer.
    #[derive(Debug, PartialEq, Eq)]
    interface IHopL2Bridge {
        event TransferSent(
            bytes32 indexed transferId,
            uint256 indexed chainId,
            address indexed recipient,
            uint256 amount,
            bytes32 transferNonce,
            uint256 bonderFee,
            uint256 index,
            uint256 amountOutMin,
            uint256 deadline
        );
    }
}

crate::sol! {
    /// Hop L2 AMM wrapper, the entry point the connector routes L2 tokens through.
    #[derive(Debug, PartialEq, Eq)]
    interface IHopL2AmmWrapper {
        /// The L2 bridge the wrapper forwards to.
        function bridge() external view returns (address);
        function l2CanonicalToken() external view returns (address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::SolEvent;

    #[test]
    fn transfer_sent_signature() {
        assert_eq!(
            IHopL2Bridge::TransferSent::SIGNATURE,
            "TransferSent(bytes32,uint256,address,uint256,bytes32,uint256,uint256,uint256,uint256)"
        );
        assert_eq!(
            IHopL2Bridge::TransferSent::SIGNATURE_HASH,
            keccak256(IHopL2Bridge::TransferSent::SIGNATURE)
        );
    }
}
