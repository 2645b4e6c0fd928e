use crate::{InvalidProposal, PageLimits, SyncError, SyncResult};
use alloy_primitives::U256;
use ornode_chain::{decode_proposal, ChainReader, Contracts};
use ornode_primitives::{
    Award, ChainProposalState, ExecStatus, GetAwardsSpec, GetProposalsSpec, GetVotesSpec,
    OrecParams, PropId, Proposal, ProposalSubmission, PutProposalStatus, Vote,
};
use ornode_reconciler::apply_effects;
use ornode_storage::{AttachOutcome, OrDb};
use tracing::{debug, error, info};

/// Accepts proposal content and serves the materialized view.
#[derive(Debug, Clone)]
pub struct ProposalSyncService<DB, C> {
    db: DB,
    chain: C,
    contracts: Contracts,
    limits: PageLimits,
}

impl<DB, C> ProposalSyncService<DB, C> {
    /// Creates a service over `db`, consulting `chain` for proposals the view does not know yet.
    pub const fn new(db: DB, chain: C, contracts: Contracts, limits: PageLimits) -> Self {
        Self { db, chain, contracts, limits }
    }

    /// Returns the page limits.
    pub const fn limits(&self) -> &PageLimits {
        &self.limits
    }
}

impl<DB, C> ProposalSyncService<DB, C>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader,
{
    /// Runs `f` against the view on a thread that is allowed to block.
    async fn spawn_blocking_io<F, R>(&self, f: F) -> SyncResult<R>
    where
        F: FnOnce(DB) -> SyncResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(db)).await.map_err(|_| SyncError::BlockingTask)?
    }

    /// Stores the content of an on-chain proposal.
    ///
    /// The content must hash to the asserted id, agree with its attachment and mint only well
    /// formed tokens. A proposal the view has not seen yet is looked up on-chain first. Submitting
    /// the same content again succeeds with [`PutProposalStatus::ProposalExists`] and keeps the
    /// first attachment.
    pub async fn put_proposal(
        &self,
        submission: ProposalSubmission,
    ) -> SyncResult<PutProposalStatus> {
        let ProposalSubmission { id, content, attachment } = submission;
        let computed = content.id();
        if computed != id {
            return Err(InvalidProposal::IdMismatch { asserted: id, computed }.into())
        }
        let decoded = decode_proposal(&content, attachment.as_ref(), &self.contracts)
            .map_err(InvalidProposal::from)?;
        decoded.check_mints().map_err(InvalidProposal::from)?;

        let known = self.spawn_blocking_io(move |db| Ok(db.proposal(id)?.is_some())).await?;
        if !known {
            let Some(state) = self.chain.proposal_state(id).await? else {
                return Err(SyncError::ProposalNotCreated(id))
            };
            let create_ts = state.create_time;
            self.spawn_blocking_io(move |db| Ok(db.record_creation(id, create_ts, None)?)).await?;
            debug!(target: "ornode::sync", %id, create_ts, "Recorded proposal from chain state");
        }

        let contracts = self.contracts;
        let kind = decoded.kind();
        self.spawn_blocking_io(move |db| match db.attach_content(id, content, attachment)? {
            AttachOutcome::Attached(proposal) => {
                if proposal.exec_status() == ExecStatus::Executed {
                    let effects = apply_effects(&db, &contracts, &proposal)?;
                    debug!(target: "ornode::sync", %id, minted = effects.minted, burned = effects.burned, "Applied effects of executed proposal");
                }
                info!(target: "ornode::sync", %id, kind, removed = proposal.removed, "Stored proposal content");
                Ok(PutProposalStatus::ProposalStored)
            }
            AttachOutcome::AlreadyAttached(_) => Ok(PutProposalStatus::ProposalExists),
            AttachOutcome::Conflict(existing) => {
                error!(target: "ornode::sync", %id, stored = %existing.id(), "Stored content differs from content hashing to the same id");
                Err(SyncError::Inconsistent { id, reason: "stored content differs" })
            }
            AttachOutcome::NotFound => {
                Err(SyncError::Inconsistent { id, reason: "record vanished while attaching" })
            }
        })
        .await
    }

    /// Returns a proposal, including soft-removed ones.
    pub async fn get_proposal(&self, id: PropId) -> SyncResult<Proposal> {
        self.spawn_blocking_io(move |db| db.proposal(id)?.ok_or(SyncError::ProposalNotFound(id)))
            .await
    }

    /// Returns a page of proposals, newest first.
    pub async fn get_proposals(&self, spec: GetProposalsSpec) -> SyncResult<Vec<Proposal>> {
        let limit = self.limits.resolve(spec.limit);
        self.spawn_blocking_io(move |db| Ok(db.proposals(&spec, limit)?)).await
    }

    /// Returns a page of votes, newest first.
    pub async fn get_votes(&self, spec: GetVotesSpec) -> SyncResult<Vec<Vote>> {
        let limit = self.limits.resolve(spec.limit);
        self.spawn_blocking_io(move |db| Ok(db.votes(&spec, limit)?)).await
    }

    /// Returns a page of awards, newest first.
    pub async fn get_awards(&self, spec: GetAwardsSpec) -> SyncResult<Vec<Award>> {
        let limit = self.limits.resolve(spec.limit);
        self.spawn_blocking_io(move |db| Ok(db.awards(&spec, limit)?)).await
    }

    /// Returns the award with the given token id.
    pub async fn get_award(&self, token_id: U256) -> SyncResult<Award> {
        self.spawn_blocking_io(move |db| {
            db.award(token_id)?.ok_or(SyncError::TokenNotFound(token_id))
        })
        .await
    }

    /// Returns the current period number, the number of ticks seen.
    pub async fn get_period_num(&self) -> SyncResult<u64> {
        self.spawn_blocking_io(|db| Ok(db.tick_count()?)).await
    }

    /// Returns the live on-chain state of a proposal.
    pub async fn get_chain_state(&self, id: PropId) -> SyncResult<ChainProposalState> {
        self.chain.proposal_state(id).await?.ok_or(SyncError::ProposalNotFound(id))
    }

    /// Returns the Orec voting parameters.
    pub async fn get_orec_params(&self) -> SyncResult<OrecParams> {
        Ok(self.chain.orec_params().await?)
    }

    /// Hides a proposal from listings unless they ask for removed proposals. Content submitted
    /// later does not make it visible again.
    pub async fn remove_proposal(&self, id: PropId) -> SyncResult<()> {
        let found = self.spawn_blocking_io(move |db| Ok(db.set_removed(id, true)?)).await?;
        if !found {
            return Err(SyncError::ProposalNotFound(id))
        }
        info!(target: "ornode::sync", %id, "Removed proposal");
        Ok(())
    }
}
