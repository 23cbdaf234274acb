use clap::Parser;
use opts::{SpellsCli, SpellsSubcommand};

mod cmd;
mod opts;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = SpellsCli::parse();

    match args.cmd {
        SpellsSubcommand::Encode(cmd) => cmd.run().await,
        SpellsSubcommand::Position(cmd) => cmd.run().await,
        SpellsSubcommand::Transfers(cmd) => cmd.run().await,
        SpellsSubcommand::Status(cmd) => cmd.run().await,
    }
}
