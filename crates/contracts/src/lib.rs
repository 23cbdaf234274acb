//! Contract bindings for the DSA core contracts, the connector spell
//! interfaces and the external protocols the connectors integrate with.

pub mod connectors;
pub mod core;
pub mod protocols;

pub use core::{ACCOUNT_VERSION, IInstaAccountV2, IInstaConnectorsV2, IInstaIndex, NATIVE_TOKEN};

/// Wraps `alloy_sol_types::sol!`, adding RPC call builders when the `rpc`
/// feature is enabled.
macro_rules! sol {
    ($($input:tt)*) => {
        #[cfg(feature = "rpc")]
        alloy_sol_types::sol! {
            #[sol(rpc)]
            $($input)*
        }

        #[cfg(not(feature = "rpc"))]
        alloy_sol_types::sol! {
            $($input)*
        }
    };
}

pub(crate) use sol;
