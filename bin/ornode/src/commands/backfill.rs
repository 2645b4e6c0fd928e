//! Command replaying a historical block range.

use crate::{args::ConfigArgs, commands::Components};
use clap::Parser;
use ornode_backfill::BackfillController;
use tracing::info;

/// Replay a block range into the store and exit
#[derive(Debug, Parser)]
pub struct Command {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// First block to replay.
    #[arg(long, value_name = "BLOCK")]
    pub from: u64,

    /// Last block to replay. Defaults to the chain head.
    #[arg(long, value_name = "BLOCK")]
    pub to: Option<u64>,
}

impl Command {
    /// Execute `backfill` command
    pub async fn execute(self) -> eyre::Result<()> {
        let config = self.config.load()?;
        config.validate()?;

        let Components { chain, reconciler, .. } = Components::build(&config)?;
        let controller = BackfillController::new(chain, config.sync.backfill);

        tokio::select! {
            res = controller.run(&*reconciler, self.from, self.to) => {
                let summary = res?;
                info!(
                    target: "ornode::cli",
                    from = summary.from,
                    to = summary.to,
                    applied = summary.applied,
                    skipped = summary.skipped,
                    "Backfill complete"
                );
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                info!(target: "ornode::cli", "Backfill interrupted");
            }
        }
        Ok(())
    }
}
