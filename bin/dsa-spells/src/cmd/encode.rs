use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes},
};
use clap::Parser;
use dsa_contracts::connectors::{IConnectV2CompoundV3, IConnectV2Hop};
use dsa_harness::{ConnectorAbis, ConnectorArtifact, EncodedSpells, Spell, SpellJson, encode_spells};
use eyre::{Result, WrapErr, bail};
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// JSON file holding a list of `{ "connector", "method", "args" }` spells
    #[arg(short, long)]
    spells: PathBuf,

    /// Connector ABI source as NAME=SOURCE, where SOURCE is `compound-v3`,
    /// `hop` or an artifact contract name (e.g. COMPOUND-V3-A=ConnectV2CompoundV3)
    #[arg(short, long = "connector", value_parser = parse_connector)]
    connectors: Vec<(String, String)>,

    /// Root of the compiled artifacts, for artifact sources
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// `origin` passed to `cast`
    #[arg(long, default_value_t = Address::ZERO)]
    origin: Address,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    format: String,
}

fn parse_connector(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(name, source)| !name.is_empty() && !source.is_empty())
        .map(|(name, source)| (name.to_string(), source.to_string()))
        .ok_or_else(|| format!("expected NAME=SOURCE, got `{s}`"))
}

impl EncodeArgs {
    pub async fn run(self) -> Result<()> {
        let (spells, encoded, calldata) = self.encode()?;

        if self.format == "json" {
            let data = serde_json::json!({
                "targets": encoded.targets,
                "datas": encoded.datas,
                "origin": self.origin,
                "calldata": calldata,
            });
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }

        println!("Spells");
        println!("======");
        println!();
        for (i, (spell, data)) in spells.iter().zip(&encoded.datas).enumerate() {
            println!("  [{i}] {}.{}", spell.connector, spell.method);
            println!("      {data}");
        }
        println!();
        println!("cast calldata (origin {}):", self.origin);
        println!("{calldata}");

        Ok(())
    }

    /// Resolve the spells file against the connector ABIs and build the
    /// `cast` calldata.
    fn encode(&self) -> Result<(Vec<Spell>, EncodedSpells, Bytes)> {
        if self.connectors.is_empty() {
            bail!("at least one --connector NAME=SOURCE is required");
        }

        let mut abis = ConnectorAbis::new();
        for (name, source) in &self.connectors {
            abis.insert(name.as_str(), self.load_abi(source)?);
        }

        let content = std::fs::read_to_string(&self.spells)
            .wrap_err_with(|| format!("failed to read {}", self.spells.display()))?;
        let spells: Vec<SpellJson> = serde_json::from_str(&content)?;
        let spells = spells
            .iter()
            .map(|spell| spell.resolve(&abis))
            .collect::<Result<Vec<_>, _>>()?;
        let encoded = encode_spells(&abis, &spells)?;
        let calldata = encoded.cast_calldata(self.origin);

        Ok((spells, encoded, calldata))
    }

    fn load_abi(&self, source: &str) -> Result<JsonAbi> {
        let abi = match source {
            "compound-v3" => IConnectV2CompoundV3::abi::contract(),
            "hop" => IConnectV2Hop::abi::contract(),
            contract => ConnectorArtifact::load(&self.artifacts_dir, contract)?.abi,
        };
        Ok(abi)
    }
}
