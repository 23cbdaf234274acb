//! Spell builders and on-chain reads for the connectors under test.

pub mod compound_v3;
pub mod hop;

pub use compound_v3::{CometReader, CompoundV3, Position, SpellIds};
pub use hop::{BridgeParams, Hop, TransferIntent};
