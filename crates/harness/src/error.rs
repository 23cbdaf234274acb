use std::path::PathBuf;

use alloy::{
    node_bindings::NodeError,
    primitives::{B256, U256, utils::UnitsError},
    providers::PendingTransactionError,
    transports::TransportError,
};

pub type Result<T, E = HarnessError> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("network `{0}` is not configured")]
    UnknownNetwork(String),

    #[error("no RPC url for network `{network}`; set `{env}` or `rpc_url`")]
    MissingRpcUrl { network: String, env: String },

    #[error("artifact `{name}` not found under {}", dir.display())]
    ArtifactNotFound { name: String, dir: PathBuf },

    #[error("invalid artifact {}: {reason}", path.display())]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("no ABI registered for connector `{0}`")]
    UnknownConnector(String),

    #[error("connector `{connector}` has no method `{method}`")]
    UnknownMethod { connector: String, method: String },

    #[error("`{connector}.{method}` takes {expected:?} arguments, got {got}")]
    ArgumentCount {
        connector: String,
        method: String,
        expected: Vec<usize>,
        got: usize,
    },

    #[error("invalid argument {index} for `{method}`: {reason}")]
    InvalidArgument {
        method: String,
        index: usize,
        reason: String,
    },

    #[error("failed to encode `{connector}.{method}`")]
    Encode {
        connector: String,
        method: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },

    #[error("cannot cast an empty spell list")]
    EmptySpells,

    #[error("connector `{0}` is not enabled in the registry")]
    ConnectorNotEnabled(String),

    #[error(
        "transaction reverted{}: {reason}",
        tx_hash.map(|h| format!(" ({h})")).unwrap_or_default()
    )]
    Reverted { tx_hash: Option<B256>, reason: String },

    #[error("event `{event}` missing from receipt {tx_hash}")]
    MissingEvent { event: &'static str, tx_hash: B256 },

    #[error("deployment receipt {0} has no contract address")]
    NoContractAddress(B256),

    #[error("node has no unlocked account at index {index} ({available} available)")]
    NoDevAccount { index: usize, available: usize },

    #[error("bonder fee for amount {amount} overflows uint256")]
    FeeOverflow { amount: U256 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    SolTypes(#[from] alloy::sol_types::Error),

    #[error(transparent)]
    Units(#[from] UnitsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl HarnessError {
    /// Whether this error is a revert, either mined or rejected at gas estimation.
    pub fn is_revert(&self) -> bool {
        match self {
            Self::Reverted { .. } => true,
            Self::Transport(err) => err.to_string().to_lowercase().contains("revert"),
            _ => false,
        }
    }
}
