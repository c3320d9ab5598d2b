//! kbsync CLI: spreadsheet knowledge bases to JSON documents or a
//! conversational-AI platform.
//!
//! Reads Intents/Entities/Answers CSV sheets, groups intents by topic, and
//! either writes two timestamped JSON files or pushes records to the remote
//! API (optionally deleting a subject's records first).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
