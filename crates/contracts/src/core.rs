//! DSA core: account factory, connector registry and the account itself.

use alloy_primitives::{Address, address};

/// Sentinel address connectors use for the chain's native asset.
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Account implementation version built by the index for DSA v2.
pub const ACCOUNT_VERSION: u64 = 2;

crate::sol! {
    /// Factory that creates DSA accounts and tracks the platform master.
    #[derive(Debug, PartialEq, Eq)]
    interface IInstaIndex {
        /// Address allowed to administer the registry.
        function master() external view returns (address);

        /// Create a new account for `owner` with the given implementation version.
        function build(
            address owner,
            uint256 accountVersion,
            address origin
        ) external returns (address account);

        event LogAccountCreated(
            address sender,
            address indexed owner,
            address indexed account,
            address indexed origin
        );
    }
}

crate::sol! {
    /// Registry mapping connector names to deployed connector contracts.
    #[derive(Debug, PartialEq, Eq)]
    interface IInstaConnectorsV2 {
        /// Enable connectors under the given names. Master only.
        function addConnectors(string[] calldata connectorNames, address[] calldata connectors) external;

        /// Whether every name is enabled, with the resolved addresses.
        function isConnectors(string[] calldata connectorNames) external view returns (bool isOk, address[] memory connectors);

        event LogConnectorAdded(
            bytes32 indexed connectorNameHash,
            string connectorName,
            address indexed connector
        );
    }
}

crate::sol! {
    /// The DSA smart-contract wallet.
    ///
    /// `cast` resolves every target name through the registry and delegate
    /// calls the matching payload. The whole batch reverts if one spell does.
    #[derive(Debug, PartialEq, Eq)]
    interface IInstaAccountV2 {
        function cast(
            string[] calldata targetNames,
            bytes[] calldata datas,
            address origin
        ) external payable returns (bytes32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn account_created_topic_matches_signature() {
        assert_eq!(
            IInstaIndex::LogAccountCreated::SIGNATURE_HASH,
            keccak256("LogAccountCreated(address,address,address,address)")
        );
    }

    #[test]
    fn cast_selector() {
        assert_eq!(
            IInstaAccountV2::castCall::SIGNATURE,
            "cast(string[],bytes[],address)"
        );
        assert_eq!(
            IInstaAccountV2::castCall::SELECTOR[..],
            keccak256(IInstaAccountV2::castCall::SIGNATURE)[..4]
        );
    }

    #[test]
    fn native_sentinel_is_checksummed_constant() {
        assert_eq!(
            NATIVE_TOKEN.to_string(),
            "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"
        );
    }
}
