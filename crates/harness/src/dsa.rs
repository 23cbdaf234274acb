//! DSA core: registry master, connector deployment, account creation and
//! spell dispatch.

use alloy::{
    json_abi::JsonAbi,
    network::TransactionBuilder,
    primitives::{Address, B256, U256, utils::parse_ether},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::{SolCall, SolEvent},
};
use dsa_contracts::{ACCOUNT_VERSION, IInstaConnectorsV2, IInstaIndex};
use tracing::info;

use crate::{
    addresses::CoreAddresses,
    artifacts::ConnectorArtifact,
    error::{HarnessError, Result},
    fork::ForkNode,
    retry::with_retry,
    spells::{ConnectorAbis, Spell, encode_spells},
};

/// Native balance given to the impersonated master so it can pay for gas.
const MASTER_GAS_FUNDS: &str = "10";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsaWallet {
    pub address: Address,
    pub owner: Address,
}

impl DsaWallet {
    /// Cast `spells` from the wallet's owner. Reverts as a unit if any spell fails.
    pub async fn cast(
        &self,
        node: &ForkNode,
        abis: &ConnectorAbis,
        spells: &[Spell],
        origin: Address,
    ) -> Result<TransactionReceipt> {
        self.cast_with_value(node, abis, spells, origin, U256::ZERO)
            .await
    }

    /// Like [`Self::cast`], attaching native value to the call.
    pub async fn cast_with_value(
        &self,
        node: &ForkNode,
        abis: &ConnectorAbis,
        spells: &[Spell],
        origin: Address,
        value: U256,
    ) -> Result<TransactionReceipt> {
        let encoded = encode_spells(abis, spells)?;
        let methods = spells
            .iter()
            .map(|spell| format!("{}.{}", spell.connector, spell.method))
            .collect::<Vec<_>>();

        let tx = TransactionRequest::default()
            .from(self.owner)
            .to(self.address)
            .value(value)
            .input(encoded.cast_calldata(origin).into());
        let receipt = node.send(tx).await?;

        info!(
            ?methods,
            tx_hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            "spells cast"
        );

        Ok(receipt)
    }
}

/// The DSA deployment on a fork, plus the ABIs of the connectors enabled so far.
#[derive(Debug, Clone)]
pub struct Dsa {
    core: CoreAddresses,
    master: Address,
    abis: ConnectorAbis,
}

impl Dsa {
    /// Impersonate the registry master and fund it for gas.
    pub async fn setup(node: &ForkNode, core: CoreAddresses) -> Result<Self> {
        let master = master_signer(node, core.insta_index).await?;
        Ok(Self {
            core,
            master,
            abis: ConnectorAbis::new(),
        })
    }

    pub fn core(&self) -> &CoreAddresses {
        &self.core
    }

    pub fn master(&self) -> Address {
        self.master
    }

    pub fn abis(&self) -> &ConnectorAbis {
        &self.abis
    }

    /// Deploy a connector from its artifact and enable it under `name`.
    pub async fn deploy_and_enable_connector(
        &mut self,
        node: &ForkNode,
        name: &str,
        artifact: &ConnectorArtifact,
    ) -> Result<Connector> {
        let tx = TransactionRequest::default()
            .from(self.master)
            .with_deploy_code(artifact.bytecode.clone());
        let receipt = node.send(tx).await?;
        let address = receipt
            .contract_address
            .ok_or(HarnessError::NoContractAddress(receipt.transaction_hash))?;

        info!(%address, tx_hash = %receipt.transaction_hash, "connector deployed");

        self.enable_connector(node, name, address, artifact.abi.clone())
            .await
    }

    /// Enable an already deployed connector under `name` and register its ABI.
    pub async fn enable_connector(
        &mut self,
        node: &ForkNode,
        name: &str,
        address: Address,
        abi: JsonAbi,
    ) -> Result<Connector> {
        let call = IInstaConnectorsV2::addConnectorsCall {
            connectorNames: vec![name.to_string()],
            connectors: vec![address],
        };
        let tx = TransactionRequest::default()
            .from(self.master)
            .to(self.core.connectors_v2)
            .input(call.abi_encode().into());
        let receipt = node.send(tx).await?;

        let name_hash = connector_name_hash(name);
        let added = receipt
            .inner
            .logs()
            .iter()
            .filter_map(|log| {
                IInstaConnectorsV2::LogConnectorAdded::decode_log_data(log.data()).ok()
            })
            .any(|event| event.connectorNameHash == name_hash && event.connector == address);
        if !added {
            return Err(HarnessError::MissingEvent {
                event: "LogConnectorAdded",
                tx_hash: receipt.transaction_hash,
            });
        }

        match self.enabled_connector(node, name).await? {
            Some(enabled) if enabled == address => {}
            _ => return Err(HarnessError::ConnectorNotEnabled(name.to_string())),
        }

        self.abis.insert(name, abi);
        info!(connector = %name, %address, "connector enabled");

        Ok(Connector {
            name: name.to_string(),
            address,
        })
    }

    /// Address the registry resolves `name` to, if enabled.
    pub async fn enabled_connector(&self, node: &ForkNode, name: &str) -> Result<Option<Address>> {
        let registry = IInstaConnectorsV2::new(self.core.connectors_v2, node.provider());
        let names = vec![name.to_string()];
        let resolved = with_retry("is_connectors", || async {
            registry.isConnectors(names.clone()).call().await
        })
        .await?;

        Ok(resolved
            .isOk
            .then(|| resolved.connectors.first().copied())
            .flatten())
    }

    /// Create a DSA v2 account owned by `owner`.
    pub async fn build_dsa(&self, node: &ForkNode, owner: Address) -> Result<DsaWallet> {
        let call = IInstaIndex::buildCall {
            owner,
            accountVersion: U256::from(ACCOUNT_VERSION),
            origin: owner,
        };
        let tx = TransactionRequest::default()
            .from(owner)
            .to(self.core.insta_index)
            .input(call.abi_encode().into());
        let receipt = node.send(tx).await?;

        let created = account_created(&receipt)?;
        info!(account = %created.account, "DSA built");

        Ok(DsaWallet {
            address: created.account,
            owner,
        })
    }

    /// Cast through `wallet` against the connectors enabled so far.
    pub async fn cast(
        &self,
        node: &ForkNode,
        wallet: &DsaWallet,
        spells: &[Spell],
        origin: Address,
    ) -> Result<TransactionReceipt> {
        wallet.cast(node, &self.abis, spells, origin).await
    }
}

/// Impersonate the index master and give it gas money.
pub async fn master_signer(node: &ForkNode, insta_index: Address) -> Result<Address> {
    let index = IInstaIndex::new(insta_index, node.provider());
    let master = with_retry("master", || async { index.master().call().await }).await?;

    node.impersonate(master).await?;
    node.set_balance(master, parse_ether(MASTER_GAS_FUNDS)?)
        .await?;

    info!(%master, "impersonating registry master");
    Ok(master)
}

/// The `LogAccountCreated` event of a `build` receipt.
pub fn account_created(receipt: &TransactionReceipt) -> Result<IInstaIndex::LogAccountCreated> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| {
            log.topics().first() == Some(&IInstaIndex::LogAccountCreated::SIGNATURE_HASH)
        })
        .find_map(|log| IInstaIndex::LogAccountCreated::decode_log_data(log.data()).ok())
        .ok_or(HarnessError::MissingEvent {
            event: "LogAccountCreated",
            tx_hash: receipt.transaction_hash,
        })
}

/// Registry key of a connector name, as indexed by `LogConnectorAdded`.
pub fn connector_name_hash(name: &str) -> B256 {
    alloy::primitives::keccak256(name.as_bytes())
}
