//! Forked-chain harness for DSA connectors.
//!
//! Forks a network at a pinned block, deploys a connector and enables it in
//! the connector registry as the registry master, builds DSA wallets and
//! casts spells through them.

pub mod addresses;
pub mod artifacts;
pub mod config;
pub mod connectors;
pub mod dsa;
pub mod error;
pub mod fork;
pub mod funding;
pub mod retry;
pub mod spells;

pub use addresses::{AddressBook, CoreAddresses, Funding, TokenInfo};
pub use artifacts::ConnectorArtifact;
pub use config::{HarnessConfig, NetworkConfig};
pub use dsa::{Connector, Dsa, DsaWallet};
pub use error::{HarnessError, Result};
pub use fork::ForkNode;
pub use spells::{ConnectorAbis, EncodedSpells, Spell, SpellJson, encode_spells};
