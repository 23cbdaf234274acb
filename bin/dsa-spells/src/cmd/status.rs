use alloy::providers::{Provider, ProviderBuilder};
use clap::Parser;
use dsa_contracts::{IInstaConnectorsV2, IInstaIndex};
use dsa_harness::{AddressBook, HarnessConfig};
use eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Path to harness config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connector names to look up in each network's registry
    #[arg(long)]
    connector: Vec<String>,
}

impl StatusArgs {
    pub async fn run(self) -> Result<()> {
        let config = if let Some(config_path) = &self.config {
            HarnessConfig::load(config_path)?
        } else {
            HarnessConfig::from_env()?
        };

        println!("DSA Harness Status");
        println!("==================");
        println!();
        println!("Artifacts: {}", config.artifacts_dir.display());
        println!();

        println!("Networks:");
        for (name, network) in &config.networks {
            print!("  {name} (chain_id: {}", network.chain_id);
            if let Some(block) = network.fork_block {
                print!(", fork block: {block}");
            }
            println!(")");

            let Some(url) = network.upstream_url() else {
                println!(
                    "    upstream: not set ({})",
                    network.rpc_url_env.as_deref().unwrap_or("rpc_url")
                );
                continue;
            };

            let provider = match ProviderBuilder::new().connect(&url).await {
                Ok(provider) => provider,
                Err(e) => {
                    println!("    connection error: {e}");
                    continue;
                }
            };
            match provider.get_block_number().await {
                Ok(block) => println!("    upstream block: {block}"),
                Err(e) => {
                    println!("    error: {e}");
                    continue;
                }
            }

            let Some(book) = AddressBook::for_network(name) else {
                println!("    no address book");
                continue;
            };

            let index = IInstaIndex::new(book.core.insta_index, &provider);
            match index.master().call().await {
                Ok(master) => println!("    registry master: {master}"),
                Err(e) => println!("    registry master: error: {e}"),
            }

            if self.connector.is_empty() {
                continue;
            }
            let registry = IInstaConnectorsV2::new(book.core.connectors_v2, &provider);
            for connector in &self.connector {
                match registry.isConnectors(vec![connector.clone()]).call().await {
                    Ok(resolved) if resolved.isOk => println!(
                        "    {connector}: enabled at {}",
                        resolved.connectors.first().copied().unwrap_or_default()
                    ),
                    Ok(_) => println!("    {connector}: not enabled"),
                    Err(e) => println!("    {connector}: error: {e}"),
                }
            }
        }

        Ok(())
    }
}
