//! Deployed addresses per network.

use alloy::primitives::{Address, address};
use dsa_contracts::NATIVE_TOKEN;

/// How a fixture obtains a token balance on a fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Funding {
    /// Native asset: set the account balance directly.
    Native,
    /// Impersonate a holder and transfer from it.
    Holder(Address),
    /// Write the token's `balanceOf` mapping, declared at this storage slot.
    BalanceSlot(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
    pub funding: Funding,
}

/// DSA core deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreAddresses {
    /// Account factory, also the source of the registry master.
    pub insta_index: Address,
    /// Connector registry.
    pub connectors_v2: Address,
}

/// Compound III USDC market (Comet proxy).
pub const COMPOUND_V3_USDC: &str = "compound-v3-usdc";
/// Hop DAI AMM wrapper, the router the Hop connector bridges DAI through.
pub const HOP_DAI_AMM_WRAPPER: &str = "hop-dai-amm-wrapper";
/// Hop DAI L2 bridge, emitter of `TransferSent`.
pub const HOP_DAI_L2_BRIDGE: &str = "hop-dai-l2-bridge";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBook {
    pub network: &'static str,
    pub core: CoreAddresses,
    pub protocols: Vec<(&'static str, Address)>,
    pub tokens: Vec<TokenInfo>,
}

impl AddressBook {
    pub fn mainnet() -> Self {
        Self {
            network: "mainnet",
            core: CoreAddresses {
                insta_index: address!("2971AdFa57b20E5a416aE5a708A8655A9c74f723"),
                connectors_v2: address!("97b0B3A8bDeFE8cB9563a3c610019Ad10DB8aD11"),
            },
            protocols: vec![(
                COMPOUND_V3_USDC,
                address!("c3d688B66703497DAA19211EEdff47f25384cdc3"),
            )],
            tokens: vec![
                TokenInfo {
                    symbol: "eth",
                    address: NATIVE_TOKEN,
                    decimals: 18,
                    funding: Funding::Native,
                },
                TokenInfo {
                    symbol: "weth",
                    address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                    decimals: 18,
                    funding: Funding::BalanceSlot(3),
                },
                TokenInfo {
                    symbol: "usdc",
                    address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                    decimals: 6,
                    funding: Funding::Holder(address!("72a53cdbbcc1b9efa39c834a540550e23463aacb")),
                },
                TokenInfo {
                    symbol: "dai",
                    address: address!("6B175474E89094C44Da98b954EedeAC495271d0F"),
                    decimals: 18,
                    funding: Funding::BalanceSlot(2),
                },
                TokenInfo {
                    symbol: "link",
                    address: address!("514910771AF9Ca656af840dff83E8264EcF986CA"),
                    decimals: 18,
                    funding: Funding::BalanceSlot(1),
                },
            ],
        }
    }

    pub fn polygon() -> Self {
        Self {
            network: "polygon",
            core: CoreAddresses {
                insta_index: address!("A9B99766E6C676Cf1975c0D3166F96C0848fF5ad"),
                connectors_v2: address!("2A00684bFAb9717C21271E0751BCcb7d2D763c88"),
            },
            protocols: vec![
                (
                    HOP_DAI_AMM_WRAPPER,
                    address!("28529fec439cfF6d7D1D5917e956dEE62Cd3BE5c"),
                ),
                (
                    HOP_DAI_L2_BRIDGE,
                    address!("Ecf268Be00308980B5b3fcd0975D47C4C8e1382a"),
                ),
            ],
            tokens: vec![
                TokenInfo {
                    symbol: "matic",
                    address: NATIVE_TOKEN,
                    decimals: 18,
                    funding: Funding::Native,
                },
                TokenInfo {
                    symbol: "dai",
                    address: address!("8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"),
                    decimals: 18,
                    funding: Funding::BalanceSlot(0),
                },
                TokenInfo {
                    symbol: "usdc",
                    address: address!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
                    decimals: 6,
                    funding: Funding::BalanceSlot(0),
                },
            ],
        }
    }

    /// Address book for a configured network name.
    pub fn for_network(name: &str) -> Option<Self> {
        match name {
            "mainnet" => Some(Self::mainnet()),
            "polygon" => Some(Self::polygon()),
            _ => None,
        }
    }

    pub fn protocol(&self, name: &str) -> Option<Address> {
        self.protocols
            .iter()
            .find_map(|(key, address)| (*key == name).then_some(*address))
    }

    pub fn token(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let book = AddressBook::mainnet();
        assert_eq!(book.token("USDC").unwrap().decimals, 6);
        assert_eq!(book.token("eth").unwrap().address, NATIVE_TOKEN);
        assert!(book.token("matic").is_none());
    }

    #[test]
    fn networks_resolve_by_name() {
        assert_eq!(AddressBook::for_network("polygon").unwrap().network, "polygon");
        assert!(AddressBook::for_network("goerli").is_none());
    }

    #[test]
    fn protocols_live_on_their_network() {
        assert!(AddressBook::mainnet().protocol(COMPOUND_V3_USDC).is_some());
        assert!(AddressBook::mainnet().protocol(HOP_DAI_L2_BRIDGE).is_none());
        assert!(AddressBook::polygon().protocol(HOP_DAI_AMM_WRAPPER).is_some());
    }

    #[test]
    fn token_addresses_are_unique_per_network() {
        for book in [AddressBook::mainnet(), AddressBook::polygon()] {
            let mut seen = std::collections::HashSet::new();
            for token in &book.tokens {
                assert!(seen.insert(token.address), "{} listed twice", token.symbol);
            }
        }
    }
}
