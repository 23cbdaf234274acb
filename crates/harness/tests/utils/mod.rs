//! Shared setup for the fork suites.

#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use dsa_harness::{AddressBook, ConnectorArtifact, Dsa, ForkNode, HarnessConfig};
use eyre::{OptionExt, WrapErr};
use tracing_subscriber::EnvFilter;

pub struct Suite {
    pub config: HarnessConfig,
    pub book: AddressBook,
    pub node: ForkNode,
    pub dsa: Dsa,
}

impl Suite {
    /// Fork `network` at its pinned block, reset it there so every suite
    /// starts from the same state, and impersonate the registry master.
    ///
    /// Returns `None`, after printing why, when no upstream RPC url is set.
    pub async fn fork(network: &str) -> eyre::Result<Option<Self>> {
        init_tracing();

        let config = HarnessConfig::from_env()?;
        let network_config = config.network(network)?;
        if network_config.upstream_url().is_none() {
            eprintln!(
                "Skipping test: {} not set",
                network_config.rpc_url_env.as_deref().unwrap_or("rpc_url")
            );
            return Ok(None);
        }

        let book = AddressBook::for_network(network).ok_or_eyre("no address book")?;
        let node = ForkNode::spawn(network, network_config)
            .await
            .wrap_err("failed to spawn fork")?;
        if let Some(block) = network_config.fork_block {
            node.reset(block).await?;
            eyre::ensure!(
                node.block_number().await? == block,
                "fork reset did not land on block {block}"
            );
        }
        let dsa = Dsa::setup(&node, book.core).await?;

        Ok(Some(Self {
            config,
            book,
            node,
            dsa,
        }))
    }

    /// Deploy the `contract` artifact and enable it as `name`.
    pub async fn enable(&mut self, name: &str, contract: &str) -> eyre::Result<Address> {
        let artifact = ConnectorArtifact::load(&self.config.artifacts_dir, contract)
            .wrap_err_with(|| format!("building the connectors is required for {contract}"))?;
        let connector = self
            .dsa
            .deploy_and_enable_connector(&self.node, name, &artifact)
            .await?;
        Ok(connector.address)
    }

    pub fn protocol(&self, name: &str) -> eyre::Result<Address> {
        self.book
            .protocol(name)
            .ok_or_else(|| eyre::eyre!("{name} missing from the {} book", self.book.network))
    }

    pub fn token(&self, symbol: &str) -> eyre::Result<Address> {
        Ok(self
            .book
            .token(symbol)
            .ok_or_else(|| eyre::eyre!("{symbol} missing from the {} book", self.book.network))?
            .address)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// `actual` within `tolerance` of `expected`; absorbs one-unit rounding and
/// interest accrued between blocks.
#[track_caller]
pub fn assert_close(actual: U256, expected: U256, tolerance: U256) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
