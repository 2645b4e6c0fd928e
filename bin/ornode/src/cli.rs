//! CLI definition and entrypoint to executable

use crate::{
    args::LogArgs,
    commands::{backfill, config_cmd, node},
};
use clap::{Parser, Subcommand};
use std::ffi::OsString;

/// The main ornode cli interface.
///
/// This is the entrypoint to the executable.
#[derive(Debug, Parser)]
#[command(author, version, about = "ornode", long_about = None)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    logs: LogArgs,
}

impl Cli {
    /// Parsers only the default CLI arguments from the given iterator
    pub fn try_parse_args_from<I, T>(itr: I) -> Result<Self, clap::error::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(itr)
    }

    /// Execute the configured cli command.
    pub fn run(self) -> eyre::Result<()> {
        let _guard = self.logs.init_tracing()?;

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        match self.command {
            Commands::Node(command) => runtime.block_on(command.execute()),
            Commands::Backfill(command) => runtime.block_on(command.execute()),
            Commands::Config(command) => command.execute(),
        }
    }
}

/// Parse CLI options, set up logging and run the chosen command.
pub fn run() -> eyre::Result<()> {
    Cli::parse().run()
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the node
    #[command(name = "node")]
    Node(node::Command),
    /// Replay a block range into the store and exit
    #[command(name = "backfill")]
    Backfill(backfill::Command),
    /// Write config to stdout
    #[command(name = "config")]
    Config(config_cmd::Command),
}
