use alloy::primitives::Address;
use clap::Parser;
use dsa_harness::{AddressBook, ForkNode, addresses::COMPOUND_V3_USDC, connectors::CometReader};
use eyre::{OptionExt, Result};

#[derive(Parser, Debug)]
pub struct PositionArgs {
    /// RPC URL of a node or fork
    #[arg(long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Account to inspect (usually a DSA)
    #[arg(short, long)]
    account: Address,

    /// Comet market (defaults to the mainnet USDC market)
    #[arg(short, long)]
    market: Option<Address>,

    /// Collateral asset symbols or addresses to report
    #[arg(long, default_values_t = ["eth".to_string(), "link".to_string()])]
    asset: Vec<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    format: String,
}

impl PositionArgs {
    pub async fn run(self) -> Result<()> {
        let book = AddressBook::mainnet();
        let market = match self.market {
            Some(market) => market,
            None => book
                .protocol(COMPOUND_V3_USDC)
                .ok_or_eyre("no default Compound III market")?,
        };
        let weth = book.token("weth").ok_or_eyre("weth missing from address book")?.address;

        let assets = self
            .asset
            .iter()
            .map(|asset| match book.token(asset) {
                Some(token) => Ok(token.address),
                None => asset
                    .parse::<Address>()
                    .map_err(|err| eyre::eyre!("unknown asset `{asset}`: {err}")),
            })
            .collect::<Result<Vec<_>>>()?;

        let node = ForkNode::connect(&self.rpc_url).await?;
        let comet = CometReader::new(market, node.provider().clone(), weth);
        let base = comet.base_token().await?;
        let position = comet.position(self.account, &assets).await?;

        if self.format == "json" {
            let collateral = self
                .asset
                .iter()
                .zip(&position.collateral)
                .map(|(symbol, (address, balance))| {
                    serde_json::json!({
                        "asset": symbol,
                        "address": address,
                        "balance": balance.to_string(),
                    })
                })
                .collect::<Vec<_>>();
            let data = serde_json::json!({
                "market": market,
                "base": base,
                "account": self.account,
                "supply": position.supply.to_string(),
                "borrow": position.borrow.to_string(),
                "collateral": collateral,
            });
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }

        println!("Compound III Position");
        println!("=====================");
        println!();
        println!("  Market:  {market}");
        println!("  Base:    {base}");
        println!("  Account: {}", self.account);
        println!("  Supply:  {}", position.supply);
        println!("  Borrow:  {}", position.borrow);
        println!();
        println!("Collateral:");
        for (symbol, (address, balance)) in self.asset.iter().zip(&position.collateral) {
            println!("  {symbol:<8} {address}  {balance}");
        }

        Ok(())
    }
}
