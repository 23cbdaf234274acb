//! Harness configuration: where connector artifacts live and how to fork
//! each network.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HarnessError, Result};

/// Env var pointing at a TOML config file.
pub const CONFIG_ENV: &str = "DSA_HARNESS_CONFIG";

/// Env var overriding `artifacts_dir`.
pub const ARTIFACTS_DIR_ENV: &str = "DSA_ARTIFACTS_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Root of the compiled contract artifacts (hardhat `artifacts/` or forge `out/`).
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,

    /// Upstream archive node. Takes precedence over `rpc_url_env`.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Env var holding the upstream archive node url.
    #[serde(default)]
    pub rpc_url_env: Option<String>,

    /// Block the fork is pinned at. Latest when unset.
    #[serde(default)]
    pub fork_block: Option<u64>,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

impl HarnessConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        debug!(path = %path.display(), networks = config.networks.len(), "loaded harness config");
        Ok(config)
    }

    /// Mainnet and Polygon pinned at the blocks the connector suites expect.
    pub fn default_test_config() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "mainnet".to_string(),
            NetworkConfig {
                chain_id: 1,
                rpc_url: None,
                rpc_url_env: Some("MAINNET_RPC_URL".to_string()),
                fork_block: Some(15_444_500),
            },
        );
        networks.insert(
            "polygon".to_string(),
            NetworkConfig {
                chain_id: 137,
                rpc_url: None,
                rpc_url_env: Some("POLYGON_RPC_URL".to_string()),
                fork_block: Some(27_054_896),
            },
        );

        Self {
            artifacts_dir: default_artifacts_dir(),
            networks,
        }
    }

    /// Config from `DSA_HARNESS_CONFIG` if set, the default test config
    /// otherwise. `DSA_ARTIFACTS_DIR` overrides the artifacts directory.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default_test_config(),
        };

        if let Some(dir) = std::env::var_os(ARTIFACTS_DIR_ENV) {
            config.artifacts_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(name)
            .ok_or_else(|| HarnessError::UnknownNetwork(name.to_string()))
    }
}

impl NetworkConfig {
    /// Upstream url, resolved from the inline value or the env var.
    pub fn upstream_url(&self) -> Option<String> {
        self.rpc_url.clone().or_else(|| {
            self.rpc_url_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|url| !url.is_empty())
        })
    }

    /// Like [`Self::upstream_url`], but an error naming the env var when unset.
    pub fn require_upstream_url(&self, network: &str) -> Result<String> {
        self.upstream_url().ok_or_else(|| HarnessError::MissingRpcUrl {
            network: network.to_string(),
            env: self.rpc_url_env.clone().unwrap_or_else(|| "rpc_url".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_toml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[networks.mainnet]
chain_id = 1
rpc_url = "http://archive:8545"
fork_block = 15444500

[networks.polygon]
chain_id = 137
rpc_url_env = "SOME_POLYGON_URL"
"#
        )
        .unwrap();

        let config = HarnessConfig::load(file.path()).unwrap();
        assert_eq!(config.artifacts_dir, PathBuf::from("artifacts"));

        let mainnet = config.network("mainnet").unwrap();
        assert_eq!(mainnet.chain_id, 1);
        assert_eq!(mainnet.fork_block, Some(15_444_500));
        assert_eq!(mainnet.upstream_url().as_deref(), Some("http://archive:8545"));

        let polygon = config.network("polygon").unwrap();
        assert_eq!(polygon.fork_block, None);
        assert_eq!(polygon.rpc_url_env.as_deref(), Some("SOME_POLYGON_URL"));
    }

    #[test]
    fn unknown_network_is_an_error() {
        let config = HarnessConfig::default_test_config();
        assert!(matches!(
            config.network("arbitrum"),
            Err(HarnessError::UnknownNetwork(name)) if name == "arbitrum"
        ));
    }

    #[test]
    fn missing_url_names_the_env_var() {
        let network = NetworkConfig {
            chain_id: 1,
            rpc_url: None,
            rpc_url_env: Some("DSA_HARNESS_TEST_UNSET_URL".to_string()),
            fork_block: None,
        };

        let err = network.require_upstream_url("mainnet").unwrap_err();
        assert!(err.to_string().contains("DSA_HARNESS_TEST_UNSET_URL"));
    }

    #[test]
    fn default_config_pins_suite_blocks() {
        let config = HarnessConfig::default_test_config();
        assert_eq!(config.network("mainnet").unwrap().fork_block, Some(15_444_500));
        assert_eq!(config.network("polygon").unwrap().fork_block, Some(27_054_896));
        assert_eq!(config.network("polygon").unwrap().chain_id, 137);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[networks.mainnet]\nchain_id = \"one\"\n").unwrap();
        assert!(matches!(
            HarnessConfig::load(file.path()),
            Err(HarnessError::Toml(_))
        ));
    }
}
