//! Spell interfaces of the connectors under test.
//!
//! Every connector method is delegate-called by the DSA and returns the
//! event name and ABI-encoded event params the account re-emits in `LogCast`.

pub mod compound_v3;
pub mod hop;

pub use compound_v3::IConnectV2CompoundV3;
pub use hop::IConnectV2Hop;
