use crate::{apply_effects, Effects, ReconcileError, ReconcilerConfig};
use backon::{ExponentialBuilder, Retryable};
use futures_util::{Stream, StreamExt};
use ornode_chain::{ChainEvent, ChainLog, ChainReader, Contracts, EventMeta, Log, TICK_SIGNAL};
use ornode_primitives::{ExecStatus, PropId, Tick, Timestamp, Vote};
use ornode_storage::{CreationOutcome, ExecutionRecord, OrDb};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, trace, warn};

/// What applying an event did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The view changed.
    Applied,
    /// The event was already reflected in the view.
    Duplicate,
    /// The event is valid but nothing is persisted for it.
    Ignored,
}

/// Turns Orec logs into changes of the materialized view.
///
/// Every event is applied idempotently, so replaying a log, or the same range during backfill,
/// leaves the view unchanged.
#[derive(Debug)]
pub struct EventReconciler<DB, C> {
    db: DB,
    chain: C,
    contracts: Contracts,
    config: ReconcilerConfig,
}

impl<DB, C> EventReconciler<DB, C> {
    /// Creates a reconciler writing to `db` and reading proposal state from `chain`.
    pub const fn new(db: DB, chain: C, contracts: Contracts, config: ReconcilerConfig) -> Self {
        Self { db, chain, contracts, config }
    }

    /// Returns the view this reconciler writes to.
    pub const fn db(&self) -> &DB {
        &self.db
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.config.retry_delay)
            .with_max_times(self.config.event_retries)
    }
}

impl<DB, C> EventReconciler<DB, C>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader,
{
    /// Runs `f` against the view on a thread that is allowed to block.
    async fn spawn_blocking_io<F, R>(&self, f: F) -> Result<R, ReconcileError>
    where
        F: FnOnce(DB) -> Result<R, ReconcileError> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(db)).await.map_err(|_| ReconcileError::BlockingTask)?
    }

    /// Applies every log of `logs` in delivery order until the stream ends.
    pub async fn run<S>(&self, mut logs: S)
    where
        S: Stream<Item = Log> + Unpin,
    {
        info!(target: "ornode::reconciler", "Reconciling live events");
        while let Some(log) = logs.next().await {
            self.ingest(&log).await;
        }
        info!(target: "ornode::reconciler", "Event stream ended");
    }

    /// Applies a log, logging and skipping it if it is malformed or keeps failing.
    pub async fn ingest(&self, log: &Log) -> Option<Reconciled> {
        match self.reconcile_log(log).await {
            Ok(outcome) => Some(outcome),
            Err(ReconcileError::Decode(err)) => {
                warn!(
                    target: "ornode::reconciler",
                    block = ?log.block_number,
                    tx = ?log.transaction_hash,
                    %err,
                    "Skipping malformed event"
                );
                None
            }
            Err(err) => {
                error!(
                    target: "ornode::reconciler",
                    block = ?log.block_number,
                    tx = ?log.transaction_hash,
                    %err,
                    "Skipping event that could not be applied"
                );
                None
            }
        }
    }

    /// Decodes a log and applies it, retrying transient failures with exponential backoff.
    pub async fn reconcile_log(&self, log: &Log) -> Result<Reconciled, ReconcileError> {
        let chain_log = ChainLog::decode(log, &self.contracts)?;
        trace!(
            target: "ornode::reconciler",
            event = chain_log.event.name(),
            id = %chain_log.meta.id,
            block = chain_log.meta.block_number,
            "Reconciling event"
        );

        (|| self.apply(&chain_log))
            .retry(self.backoff())
            .when(ReconcileError::is_retryable)
            .notify(|err, after| {
                warn!(
                    target: "ornode::reconciler",
                    event = chain_log.event.name(),
                    id = %chain_log.meta.id,
                    %err,
                    ?after,
                    "Retrying event"
                );
            })
            .await
    }

    async fn apply(&self, log: &ChainLog) -> Result<Reconciled, ReconcileError> {
        let meta = log.meta;
        match &log.event {
            ChainEvent::ProposalCreated { prop_id } => self.on_created(*prop_id, &meta).await,
            ChainEvent::VoteIndexed { prop_id, voter, vote, weight } => {
                let vote = Vote {
                    proposal_id: *prop_id,
                    voter: *voter,
                    vote: *vote,
                    weight: *weight,
                    ts: self.event_ts(&meta).await?,
                    event: meta.id,
                };
                let inserted = self.spawn_blocking_io(move |db| Ok(db.insert_vote(vote)?)).await?;
                Ok(if inserted { Reconciled::Applied } else { Reconciled::Duplicate })
            }
            ChainEvent::Executed { prop_id } => {
                self.on_execution(*prop_id, ExecStatus::Executed, &meta).await
            }
            ChainEvent::ExecutionFailed { prop_id } => {
                self.on_execution(*prop_id, ExecStatus::ExecutionFailed, &meta).await
            }
            ChainEvent::Signal { signal_type, .. } if *signal_type == TICK_SIGNAL => {
                let tick = Tick {
                    event: meta.id,
                    block_number: meta.block_number,
                    ts: self.event_ts(&meta).await?,
                };
                let period = self
                    .spawn_blocking_io(move |db| {
                        Ok(if db.insert_tick(tick)? { Some(db.tick_count()?) } else { None })
                    })
                    .await?;
                let Some(period) = period else { return Ok(Reconciled::Duplicate) };
                info!(target: "ornode::reconciler", period, block = meta.block_number, "Period advanced");
                Ok(Reconciled::Applied)
            }
            ChainEvent::Signal { signal_type, data } => {
                info!(target: "ornode::reconciler", signal_type, %data, id = %meta.id, "Custom signal");
                Ok(Reconciled::Ignored)
            }
        }
    }

    async fn on_created(&self, id: PropId, meta: &EventMeta) -> Result<Reconciled, ReconcileError> {
        let known_ts = self
            .spawn_blocking_io(move |db| Ok(db.proposal(id)?.and_then(|p| p.create_ts)))
            .await?;
        let create_ts = match known_ts {
            Some(ts) => ts,
            None => self.creation_time(id, meta).await?,
        };
        let tx_hash = Some(meta.id.tx_hash);
        let outcome = self
            .spawn_blocking_io(move |db| Ok(db.record_creation(id, create_ts, tx_hash)?))
            .await?;
        match outcome {
            CreationOutcome::Inserted => {
                debug!(target: "ornode::reconciler", %id, create_ts, "Recorded proposal");
                Ok(Reconciled::Applied)
            }
            CreationOutcome::Filled => Ok(Reconciled::Applied),
            CreationOutcome::Unchanged => Ok(Reconciled::Duplicate),
        }
    }

    async fn on_execution(
        &self,
        id: PropId,
        status: ExecStatus,
        meta: &EventMeta,
    ) -> Result<Reconciled, ReconcileError> {
        let previous = self.spawn_blocking_io(move |db| Ok(db.proposal(id)?)).await?;
        if previous.is_none() {
            let create_ts = self.creation_time(id, meta).await?;
            self.spawn_blocking_io(move |db| Ok(db.record_creation(id, create_ts, None)?)).await?;
            debug!(target: "ornode::reconciler", %id, "Recorded stub for proposal executed before its creation was seen");
        }
        let unchanged = previous.as_ref().is_some_and(|p| {
            p.status == Some(status) && p.execute_tx_hash == Some(meta.id.tx_hash)
        });

        let record = ExecutionRecord {
            status,
            tx_hash: Some(meta.id.tx_hash),
            ts: Some(self.event_ts(meta).await?),
        };
        let contracts = self.contracts;
        let executed = self
            .spawn_blocking_io(move |db| {
                let Some(proposal) = db.record_execution(id, record)? else { return Ok(None) };
                let effects = match apply_effects(&db, &contracts, &proposal) {
                    Ok(effects) => effects,
                    Err(ReconcileError::Decode(err)) => {
                        warn!(target: "ornode::reconciler", %id, %err, "Content of executed proposal does not decode");
                        Effects::default()
                    }
                    Err(err) => return Err(err),
                };
                Ok(Some((proposal, effects)))
            })
            .await?;
        let Some((proposal, effects)) = executed else {
            warn!(target: "ornode::reconciler", %id, "Executed proposal vanished from the view");
            return Ok(Reconciled::Ignored)
        };

        if unchanged && effects == Effects::default() {
            return Ok(Reconciled::Duplicate)
        }
        info!(
            target: "ornode::reconciler",
            %id,
            ?status,
            has_content = proposal.has_content(),
            minted = effects.minted,
            burned = effects.burned,
            "Proposal executed"
        );
        Ok(Reconciled::Applied)
    }

    /// Creation time of a proposal according to Orec, falling back to the event's block.
    async fn creation_time(
        &self,
        id: PropId,
        meta: &EventMeta,
    ) -> Result<Timestamp, ReconcileError> {
        match self.chain.proposal_state(id).await? {
            Some(state) => Ok(state.create_time),
            None => self.event_ts(meta).await,
        }
    }

    async fn event_ts(&self, meta: &EventMeta) -> Result<Timestamp, ReconcileError> {
        match meta.block_timestamp {
            Some(ts) => Ok(ts),
            None => Ok(self.chain.block_timestamp(meta.block_number).await?),
        }
    }

    /// Soft-removes proposals without content created more than the configured retention before
    /// `now`. Returns the number of removed proposals; nothing is removed without a retention.
    pub async fn prune_stale_stubs(&self, now: Timestamp) -> Result<usize, ReconcileError> {
        let Some(retention) = self.config.stub_retention else { return Ok(0) };
        let cutoff = now.saturating_sub(retention.as_secs());
        let pruned = self
            .spawn_blocking_io(move |db| {
                let mut pruned = 0;
                for id in db.stale_stubs(cutoff)? {
                    // content may have arrived since the listing
                    if db.remove_if_stale(id, cutoff)? {
                        pruned += 1;
                    }
                }
                Ok(pruned)
            })
            .await?;
        if pruned > 0 {
            info!(target: "ornode::reconciler", count = pruned, "Removed stale proposal stubs");
        }
        Ok(pruned)
    }

    /// Prunes stale stubs every `prune_interval`. Returns immediately if pruning is disabled.
    pub async fn run_pruner(&self) {
        if self.config.stub_retention.is_none() {
            debug!(target: "ornode::reconciler", "Stub pruning disabled");
            return
        }
        let mut interval = tokio::time::interval(self.config.prune_interval);
        loop {
            interval.tick().await;
            if let Err(err) = self.prune_stale_stubs(unix_now()).await {
                error!(target: "ornode::reconciler", %err, "Failed to prune stale stubs");
            }
        }
    }
}

fn unix_now() -> Timestamp {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}
