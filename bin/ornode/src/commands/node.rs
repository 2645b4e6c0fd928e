//! Main node command for launching a node

use crate::{
    args::{ConfigArgs, ModeArg},
    commands::Components,
};
use clap::Parser;
use ornode_backfill::BackfillController;
use ornode_config::{Config, SyncMode};
use ornode_sync::ProposalSyncService;
use ornode_transport::{ResilientSubscription, WsLogsConnector};
use std::sync::Arc;
use tracing::{info, warn};

/// Start the node
#[derive(Debug, Parser)]
pub struct Command {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Overrides the startup mode of the configuration.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Overrides the first block of the backfill range.
    #[arg(long, value_name = "BLOCK")]
    pub from: Option<u64>,

    /// Overrides the last block of the backfill range.
    #[arg(long, value_name = "BLOCK")]
    pub to: Option<u64>,
}

impl Command {
    /// Applies the command line overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.sync.mode = mode.into();
        }
        if let Some(from) = self.from {
            config.sync.from_block = from;
        }
        if self.to.is_some() {
            config.sync.to_block = self.to;
        }
    }

    /// Execute `node` command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut config = self.config.load()?;
        self.apply(&mut config);
        config.validate()?;

        let Components { db, chain, contracts, reconciler } = Components::build(&config)?;
        let service = ProposalSyncService::new(db, chain.clone(), contracts, config.rpc.pages);
        let rpc = ornode_rpc::launch(&config.rpc, Arc::new(service)).await?;

        let pruner = tokio::spawn({
            let reconciler = Arc::clone(&reconciler);
            async move { reconciler.run_pruner().await }
        });

        let result = match config.sync.mode {
            SyncMode::Listen => {
                let connector = WsLogsConnector::new(config.chain.ws_url()?, contracts.orec);
                let (subscription, logs) =
                    ResilientSubscription::spawn(connector, config.transport);
                info!(target: "ornode::cli", orec = %contracts.orec, "Listening for Orec events");

                let result = tokio::select! {
                    _ = reconciler.run(logs) => {
                        warn!(target: "ornode::cli", "Event subscription ended");
                        Ok(())
                    }
                    res = tokio::signal::ctrl_c() => res.map_err(eyre::Report::from),
                };
                subscription.stop().await;
                result
            }
            SyncMode::Backfill => {
                let controller = BackfillController::new(chain, config.sync.backfill);
                let from = config.sync.from_block;
                tokio::select! {
                    res = controller.run(&*reconciler, from, config.sync.to_block) => match res {
                        Ok(summary) => {
                            info!(target: "ornode::cli", ?summary, "Serving the view until ctrl-c");
                            tokio::signal::ctrl_c().await.map_err(eyre::Report::from)
                        }
                        Err(err) => Err(eyre::Report::from(err)),
                    },
                    res = tokio::signal::ctrl_c() => res.map_err(eyre::Report::from),
                }
            }
        };

        info!(target: "ornode::cli", "Shutting down");
        pruner.abort();
        if rpc.stop() {
            rpc.stopped().await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_to_config() {
        let cmd = Command::try_parse_from(["node", "--mode", "backfill", "--to", "50"]).unwrap();
        let mut config = Config::default();
        config.sync.from_block = 7;
        cmd.apply(&mut config);
        assert_eq!(config.sync.mode, SyncMode::Backfill);
        assert_eq!(config.sync.from_block, 7);
        assert_eq!(config.sync.to_block, Some(50));

        let cmd = Command::try_parse_from(["node"]).unwrap();
        let before = config.clone();
        cmd.apply(&mut config);
        assert_eq!(config, before);
    }
}
