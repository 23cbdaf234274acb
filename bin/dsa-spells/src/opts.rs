use crate::cmd::{
    encode::EncodeArgs, position::PositionArgs, status::StatusArgs, transfers::TransfersArgs,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dsa-spells")]
#[command(version, about = "CLI for DSA connector spells", long_about = None)]
pub struct SpellsCli {
    #[command(subcommand)]
    pub cmd: SpellsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SpellsSubcommand {
    /// Encode a JSON spell list into `cast` calldata
    Encode(EncodeArgs),

    /// Show an account's Compound III position
    Position(PositionArgs),

    /// List Hop `TransferSent` intents in a block range
    Transfers(TransfersArgs),

    /// Check configured networks and the DSA registry
    Status(StatusArgs),
}
