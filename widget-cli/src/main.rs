//! Binary crate for the `weather-widget` command-line host.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and query prompts
//! - Printing the widget container as text or HTML

use clap::Parser;

mod cli;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logger::init_logger(cmd.verbose);
    cmd.run().await
}
