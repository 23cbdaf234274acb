//! Interfaces of the external protocols the connectors talk to.

pub mod comet;
pub mod erc20;
pub mod hop;

pub use comet::IComet;
pub use erc20::IERC20;
pub use hop::{IHopL2AmmWrapper, IHopL2Bridge};
