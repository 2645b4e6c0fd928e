use crate::{BackfillConfig, BackfillError};
use backon::{ExponentialBuilder, Retryable};
use ornode_chain::{ChainError, ChainReader, Log, LogSource};
use ornode_reconciler::{EventReconciler, ReconcileError, Reconciled};
use ornode_storage::OrDb;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Counters of a finished backfill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// First replayed block.
    pub from: u64,
    /// Last replayed block.
    pub to: u64,
    /// Windows fetched.
    pub windows: usize,
    /// Logs seen.
    pub logs: usize,
    /// Logs that changed the view.
    pub applied: usize,
    /// Malformed logs.
    pub skipped: usize,
}

/// Replays historical logs of a block range.
#[derive(Debug)]
pub struct BackfillController<L> {
    source: L,
    config: BackfillConfig,
}

impl<L: LogSource> BackfillController<L> {
    /// Creates a controller fetching logs from `source`.
    pub const fn new(source: L, config: BackfillConfig) -> Self {
        Self { source, config }
    }

    /// Replays blocks `from..=to` through `reconciler`. Without `to` the range ends at the chain
    /// head at the time of the call.
    ///
    /// Malformed logs are skipped. Any other failure that persists through the reconciler's
    /// retries aborts the run with the position of the failing log.
    pub async fn run<DB, C>(
        &self,
        reconciler: &EventReconciler<DB, C>,
        from: u64,
        to: Option<u64>,
    ) -> Result<BackfillSummary, BackfillError>
    where
        DB: OrDb + Clone + 'static,
        C: ChainReader,
    {
        let to = match to {
            Some(to) => to,
            None => self.source.latest_block().await.map_err(BackfillError::Head)?,
        };
        if to < from {
            return Err(BackfillError::InvalidRange { from, to })
        }
        info!(target: "ornode::backfill", from, to, step = self.config.step_range, "Starting backfill");

        let mut summary = BackfillSummary { from, to, ..Default::default() };
        for window in windows(from, to, self.config.step_range) {
            let logs = self.fetch(window.clone()).await?;
            debug!(
                target: "ornode::backfill",
                from = window.start(),
                to = window.end(),
                logs = logs.len(),
                "Fetched window"
            );
            summary.windows += 1;
            summary.logs += logs.len();
            for log in &logs {
                match reconciler.reconcile_log(log).await {
                    Ok(Reconciled::Applied) => summary.applied += 1,
                    Ok(_) => {}
                    Err(ReconcileError::Decode(err)) => {
                        warn!(
                            target: "ornode::backfill",
                            block = ?log.block_number,
                            log_index = ?log.log_index,
                            %err,
                            "Skipping malformed event"
                        );
                        summary.skipped += 1;
                    }
                    Err(source) => {
                        return Err(BackfillError::Event {
                            block: log.block_number.unwrap_or(*window.start()),
                            log_index: log.log_index.unwrap_or_default(),
                            source,
                        })
                    }
                }
            }
        }

        info!(
            target: "ornode::backfill",
            from,
            to,
            logs = summary.logs,
            applied = summary.applied,
            skipped = summary.skipped,
            "Backfill finished"
        );
        Ok(summary)
    }

    /// Fetches the logs of a window ordered by block and log index, retrying failures.
    async fn fetch(&self, window: RangeInclusive<u64>) -> Result<Vec<Log>, BackfillError> {
        let (from, to) = (*window.start(), *window.end());
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.config.retry_delay)
            .with_max_times(self.config.max_retries);

        let mut logs = (|| self.source.logs(from, to))
            .retry(backoff)
            .when(ChainError::is_retryable)
            .notify(|err, after| {
                warn!(target: "ornode::backfill", from, to, %err, ?after, "Retrying window");
            })
            .await
            .map_err(|source| BackfillError::Window { from, to, source })?;

        logs.sort_by_key(|log| (log.block_number, log.log_index));
        Ok(logs)
    }
}

/// Splits `from..=to` into consecutive windows of at most `step` blocks.
fn windows(from: u64, to: u64, step: u64) -> impl Iterator<Item = RangeInclusive<u64>> {
    let step = step.max(1);
    let mut next = Some(from);
    std::iter::from_fn(move || {
        let start = next.filter(|start| *start <= to)?;
        let end = start.saturating_add(step - 1).min(to);
        next = end.checked_add(1);
        Some(start..=end)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address, Bytes, U256};
    use assert_matches::assert_matches;
    use ornode_chain::{
        test_utils::{contracts, token_id, LogBuilder, MockChain},
        Mint, TICK_SIGNAL,
    };
    use ornode_primitives::{GetAwardsSpec, GetProposalsSpec, GetVotesSpec, VoteType};
    use ornode_reconciler::ReconcilerConfig;
    use ornode_storage::{AwardStore, MemoryOrDb, ProposalStore, TickStore, VoteStore};
    use std::{sync::Arc, time::Duration};

    const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");

    fn config(step_range: u64, max_retries: usize) -> BackfillConfig {
        BackfillConfig { step_range, max_retries, retry_delay: Duration::from_millis(1) }
    }

    fn reconciler(chain: &MockChain) -> EventReconciler<Arc<MemoryOrDb>, MockChain> {
        let config =
            ReconcilerConfig { retry_delay: Duration::from_millis(1), ..Default::default() };
        EventReconciler::new(Arc::new(MemoryOrDb::new()), chain.clone(), contracts(), config)
    }

    /// A chain where one proposal is created, voted on and executed, with a tick in between.
    fn populated_chain() -> (MockChain, Vec<Log>) {
        let chain = MockChain::default();
        let mint = Mint { token_id: token_id(1, ALICE), amount: U256::from(5) };
        let content = contracts().account_content(mint, Bytes::from_static(b"m"));
        let id = content.id();
        chain.add_proposal(id, 10);

        // pushed out of order within a block to check sorting
        let logs = vec![
            LogBuilder::new(3, 1).vote(id, ALICE, VoteType::Yes, 9),
            LogBuilder::new(3, 0).proposal_created(id),
            LogBuilder::new(7, 0).signal(TICK_SIGNAL, Bytes::new()),
            LogBuilder::new(12, 4).executed(id),
        ];
        for log in &logs {
            chain.push_log(log.clone());
        }
        (chain, logs)
    }

    #[test]
    fn windows_cover_range() {
        let all: Vec<_> = windows(0, 9, 4).collect();
        assert_eq!(all, vec![0..=3, 4..=7, 8..=9]);
        assert_eq!(windows(5, 5, 100).collect::<Vec<_>>(), vec![5..=5]);
        assert_eq!(windows(0, 2, 0).count(), 3);
        let top: Vec<_> = windows(u64::MAX - 1, u64::MAX, 10).collect();
        assert_eq!(top, vec![u64::MAX - 1..=u64::MAX]);
    }

    #[tokio::test]
    async fn replays_range_in_windows() {
        let (chain, _) = populated_chain();
        let rec = reconciler(&chain);
        let controller = BackfillController::new(chain.clone(), config(5, 0));

        let summary = controller.run(&rec, 0, None).await.unwrap();
        assert_eq!(summary.to, 12);
        assert_eq!(summary.windows, 3);
        assert_eq!(summary.logs, 4);
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.skipped, 0);
        assert_eq!(chain.log_fetch_count(), 3);

        assert_eq!(rec.db().tick_count().unwrap(), 1);
        assert_eq!(rec.db().votes(&GetVotesSpec::default(), 10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn backfill_matches_live_reconciliation() {
        let (chain, logs) = populated_chain();

        let live = reconciler(&chain);
        let mut ordered = logs.clone();
        ordered.sort_by_key(|log| (log.block_number, log.log_index));
        live.run(futures_util::stream::iter(ordered)).await;

        let replayed = reconciler(&chain);
        let controller = BackfillController::new(chain.clone(), config(2, 0));
        controller.run(&replayed, 0, Some(20)).await.unwrap();

        let (a, b) = (live.db(), replayed.db());
        let spec = GetProposalsSpec { include_removed: true, ..Default::default() };
        assert_eq!(a.proposals(&spec, 100).unwrap(), b.proposals(&spec, 100).unwrap());
        let spec = GetVotesSpec::default();
        assert_eq!(a.votes(&spec, 100).unwrap(), b.votes(&spec, 100).unwrap());
        let spec = GetAwardsSpec::default();
        assert_eq!(a.awards(&spec, 100).unwrap(), b.awards(&spec, 100).unwrap());
        assert_eq!(a.tick_count().unwrap(), b.tick_count().unwrap());

        // a second pass changes nothing
        let controller = BackfillController::new(chain, config(100, 0));
        let summary = controller.run(&replayed, 0, Some(20)).await.unwrap();
        assert_eq!(summary.applied, 0);
    }

    #[tokio::test]
    async fn retries_failed_windows() {
        let (chain, _) = populated_chain();
        let rec = reconciler(&chain);
        chain.fail_log_fetches(2);

        let controller = BackfillController::new(chain.clone(), config(100, 3));
        let summary = controller.run(&rec, 0, None).await.unwrap();
        assert_eq!(summary.logs, 4);
        assert_eq!(chain.log_fetch_count(), 3);
    }

    #[tokio::test]
    async fn fails_with_window_after_retries() {
        let (chain, _) = populated_chain();
        let rec = reconciler(&chain);
        chain.fail_log_fetches(10);

        let controller = BackfillController::new(chain.clone(), config(5, 2));
        let result = controller.run(&rec, 0, Some(12)).await;
        assert_matches!(result, Err(BackfillError::Window { from: 0, to: 4, .. }));
        assert_eq!(chain.log_fetch_count(), 3);
        assert!(rec.db().proposals(&GetProposalsSpec::default(), 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn fails_at_event_that_keeps_failing() {
        let (chain, _) = populated_chain();
        let rec = reconciler(&chain);
        chain.fail_state_reads(usize::MAX);

        let controller = BackfillController::new(chain.clone(), config(100, 0));
        let result = controller.run(&rec, 0, Some(20)).await;
        assert_matches!(
            result,
            Err(BackfillError::Event { block: 3, log_index: 0, source: ReconcileError::Chain(_) })
        );
        assert!(rec.db().proposals(&GetProposalsSpec::default(), 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_malformed_logs_as_skipped() {
        let (chain, _) = populated_chain();
        chain.push_log(LogBuilder::new(5, 0).raw(alloy_primitives::LogData::new_unchecked(
            vec![alloy_primitives::B256::repeat_byte(0xee)],
            Bytes::new(),
        )));
        let rec = reconciler(&chain);

        let summary = BackfillController::new(chain, config(100, 0)).run(&rec, 0, None).await;
        let summary = summary.unwrap();
        assert_eq!(summary.logs, 5);
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn rejects_inverted_range() {
        let (chain, _) = populated_chain();
        let rec = reconciler(&chain);
        let result = BackfillController::new(chain, config(5, 0)).run(&rec, 10, Some(3)).await;
        assert_matches!(result, Err(BackfillError::InvalidRange { from: 10, to: 3 }));
    }
}
