//! Forked chain node.
//!
//! Wraps an anvil process forking an upstream archive node at a pinned
//! block. Every account the node reports is unlocked, and impersonated
//! accounts behave the same, so transactions are submitted unsigned with
//! `from` set.

use alloy::{
    node_bindings::{Anvil, AnvilInstance},
    primitives::{Address, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder, ext::AnvilApi},
    rpc::types::{TransactionReceipt, TransactionRequest, anvil::Forking},
    transports::TransportError,
};
use tracing::{debug, info};

use crate::{
    config::NetworkConfig,
    error::{HarnessError, Result},
    retry::with_retry,
};

pub struct ForkNode {
    provider: DynProvider,
    endpoint: String,
    upstream_url: Option<String>,
    dev_accounts: Vec<Address>,
    /// Keeps the spawned process alive; killed on drop.
    _anvil: Option<AnvilInstance>,
}

impl ForkNode {
    /// Spawn anvil forking the network's upstream at its pinned block.
    pub async fn spawn(network_name: &str, network: &NetworkConfig) -> Result<Self> {
        let upstream_url = network.require_upstream_url(network_name)?;

        let mut anvil = Anvil::new()
            .fork(upstream_url.clone())
            .chain_id(network.chain_id);
        if let Some(block) = network.fork_block {
            anvil = anvil.fork_block_number(block);
        }
        let anvil = anvil.try_spawn()?;

        let endpoint = anvil.endpoint_url();
        let provider = ProviderBuilder::new().connect_http(endpoint.clone()).erased();
        let dev_accounts = anvil.addresses().to_vec();

        info!(
            network = %network_name,
            %endpoint,
            fork_block = ?network.fork_block,
            accounts = dev_accounts.len(),
            "fork node started"
        );

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            upstream_url: Some(upstream_url),
            dev_accounts,
            _anvil: Some(anvil),
        })
    }

    /// Attach to a node that is already running. Nodes that do not expose
    /// `eth_accounts` are attached with no unlocked accounts.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().connect(endpoint).await?.erased();
        let dev_accounts = match provider.get_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                debug!(%endpoint, %err, "eth_accounts unavailable");
                Vec::new()
            }
        };

        debug!(%endpoint, accounts = dev_accounts.len(), "attached to fork node");

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            upstream_url: None,
            dev_accounts,
            _anvil: None,
        })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Unlocked accounts funded by the node, in order (`wallet0`, `wallet1`, ...).
    pub fn dev_accounts(&self) -> &[Address] {
        &self.dev_accounts
    }

    /// The `index`-th unlocked account.
    pub fn wallet(&self, index: usize) -> Result<Address> {
        self.dev_accounts
            .get(index)
            .copied()
            .ok_or(HarnessError::NoDevAccount {
                index,
                available: self.dev_accounts.len(),
            })
    }

    /// Re-fork the upstream at `block`, discarding all local state.
    pub async fn reset(&self, block: u64) -> Result<()> {
        let forking = Forking {
            json_rpc_url: self.upstream_url.clone(),
            block_number: Some(block),
        };
        self.provider.anvil_reset(Some(forking)).await?;
        info!(block, "fork reset");
        Ok(())
    }

    pub async fn impersonate(&self, account: Address) -> Result<()> {
        self.provider.anvil_impersonate_account(account).await?;
        debug!(%account, "impersonating");
        Ok(())
    }

    pub async fn stop_impersonating(&self, account: Address) -> Result<()> {
        self.provider
            .anvil_stop_impersonating_account(account)
            .await?;
        Ok(())
    }

    pub async fn set_balance(&self, account: Address, wei: U256) -> Result<()> {
        self.provider.anvil_set_balance(account, wei).await?;
        debug!(%account, %wei, "native balance set");
        Ok(())
    }

    pub async fn set_storage(&self, contract: Address, slot: B256, value: B256) -> Result<()> {
        self.provider
            .anvil_set_storage_at(contract, slot.into(), value)
            .await?;
        Ok(())
    }

    pub async fn native_balance(&self, account: Address) -> Result<U256> {
        with_retry("get_balance", || async {
            Ok(self.provider.get_balance(account).await?)
        })
        .await
    }

    pub async fn block_number(&self) -> Result<u64> {
        with_retry("get_block_number", || async {
            Ok(self.provider.get_block_number().await?)
        })
        .await
    }

    /// Submit a transaction from an unlocked or impersonated account and wait
    /// for it to be mined.
    ///
    /// A revert, whether caught at gas estimation or mined with status 0, is
    /// reported as [`HarnessError::Reverted`].
    pub async fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
        let from = tx.from;
        let to = tx.to.and_then(|kind| kind.to().copied());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(classify_send_error)?;
        let receipt = pending.get_receipt().await?;

        if !receipt.status() {
            return Err(HarnessError::Reverted {
                tx_hash: Some(receipt.transaction_hash),
                reason: "mined with status 0".to_string(),
            });
        }

        debug!(
            from = ?from,
            to = ?to,
            tx_hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "transaction mined"
        );

        Ok(receipt)
    }

    /// Transfer native currency between accounts.
    pub async fn send_value(
        &self,
        from: Address,
        to: Address,
        wei: U256,
    ) -> Result<TransactionReceipt> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .value(wei);
        self.send(tx).await
    }
}

fn classify_send_error(err: TransportError) -> HarnessError {
    let reason = err.to_string();
    if reason.to_lowercase().contains("revert") {
        HarnessError::Reverted {
            tx_hash: None,
            reason,
        }
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_index_past_the_unlocked_accounts_is_an_error() {
        let node = ForkNode {
            provider: ProviderBuilder::new()
                .connect_http("http://127.0.0.1:1".parse().unwrap())
                .erased(),
            endpoint: "http://127.0.0.1:1".to_string(),
            upstream_url: None,
            dev_accounts: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
            _anvil: None,
        };

        assert_eq!(node.wallet(1).unwrap(), Address::repeat_byte(0x02));
        let err = node.wallet(2).unwrap_err();
        assert!(matches!(err, HarnessError::NoDevAccount { index: 2, available: 2 }));
    }

    #[test]
    fn revert_at_estimation_is_classified_as_revert() {
        let err = TransportError::local_usage_str("execution reverted: not-master");
        assert!(classify_send_error(err).is_revert());

        let err = TransportError::local_usage_str("connection refused");
        assert!(!matches!(classify_send_error(err), HarnessError::Reverted { .. }));
    }
}
