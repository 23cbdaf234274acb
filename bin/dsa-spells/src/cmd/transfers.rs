use alloy::primitives::Address;
use clap::Parser;
use dsa_harness::{
    AddressBook, ForkNode, addresses::HOP_DAI_L2_BRIDGE, connectors::hop::transfer_intents,
};
use eyre::{OptionExt, Result};

#[derive(Parser, Debug)]
pub struct TransfersArgs {
    /// RPC URL of a polygon node or fork
    #[arg(long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Hop L2 bridge (defaults to the polygon DAI bridge)
    #[arg(long)]
    l2_bridge: Option<Address>,

    /// First block of the range
    #[arg(long)]
    from_block: u64,

    /// Last block of the range (defaults to latest)
    #[arg(long)]
    to_block: Option<u64>,

    /// Show only transfers to this recipient
    #[arg(long)]
    recipient: Option<Address>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    format: String,
}

impl TransfersArgs {
    pub async fn run(self) -> Result<()> {
        let l2_bridge = match self.l2_bridge {
            Some(bridge) => bridge,
            None => AddressBook::polygon()
                .protocol(HOP_DAI_L2_BRIDGE)
                .ok_or_eyre("no default Hop L2 bridge")?,
        };

        let node = ForkNode::connect(&self.rpc_url).await?;
        let to_block = match self.to_block {
            Some(block) => block,
            None => node.block_number().await?,
        };

        let intents = transfer_intents(&node, l2_bridge, self.from_block, to_block)
            .await?
            .into_iter()
            .filter(|intent| self.recipient.is_none_or(|r| r == intent.recipient))
            .collect::<Vec<_>>();

        if self.format == "json" {
            let data = intents
                .iter()
                .map(|intent| {
                    serde_json::json!({
                        "transfer_id": intent.transfer_id,
                        "chain_id": intent.chain_id.to_string(),
                        "recipient": intent.recipient,
                        "amount": intent.amount.to_string(),
                        "bonder_fee": intent.bonder_fee.to_string(),
                        "amount_out_min": intent.amount_out_min.to_string(),
                        "deadline": intent.deadline.to_string(),
                        "block": intent.block,
                        "tx_hash": intent.tx_hash,
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }

        println!("Hop Transfer Intents");
        println!("====================");
        println!();
        println!("  Bridge: {l2_bridge}");
        println!("  Blocks: {}..={to_block}", self.from_block);
        println!("  Found:  {}", intents.len());
        println!();

        for intent in &intents {
            println!("  {}", intent.transfer_id);
            println!("    chain:      {}", intent.chain_id);
            println!("    recipient:  {}", intent.recipient);
            println!("    amount:     {}", intent.amount);
            println!("    bonder fee: {}", intent.bonder_fee);
            println!("    deadline:   {}", intent.deadline);
            if let Some(block) = intent.block {
                println!("    block:      {block}");
            }
        }

        Ok(())
    }
}
