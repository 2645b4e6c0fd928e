use crate::StorageResult;
use alloy_primitives::TxHash;
use ornode_primitives::{
    Attachment, ExecStatus, GetProposalsSpec, PropId, Proposal, ProposalContent, Timestamp,
};

/// Outcome of [`ProposalStore::record_creation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationOutcome {
    /// A new stub was inserted.
    Inserted,
    /// The record existed and missing creation fields were filled in.
    Filled,
    /// The record existed and nothing changed.
    Unchanged,
}

/// Outcome of [`ProposalStore::attach_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Content was attached. Carries the updated record.
    Attached(Proposal),
    /// The same content was already attached. Carries the unchanged record.
    AlreadyAttached(Proposal),
    /// Different content is attached. Carries the stored content, which was left untouched.
    Conflict(ProposalContent),
    /// No record with this id exists.
    NotFound,
}

/// Execution fields of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionRecord {
    /// Execution outcome.
    pub status: ExecStatus,
    /// Executing transaction.
    pub tx_hash: Option<TxHash>,
    /// Timestamp of the executing block.
    pub ts: Option<Timestamp>,
}

/// Access to proposal records.
#[auto_impl::auto_impl(&, Arc)]
pub trait ProposalStore: Send + Sync {
    /// Returns the proposal with the given id.
    fn proposal(&self, id: PropId) -> StorageResult<Option<Proposal>>;

    /// Inserts a stub if no record exists, otherwise fills missing creation fields.
    fn record_creation(
        &self,
        id: PropId,
        create_ts: Timestamp,
        create_tx_hash: Option<TxHash>,
    ) -> StorageResult<CreationOutcome>;

    /// Attaches content and attachment unless content is already present.
    ///
    /// A proposal hidden as a stale stub becomes visible again in the same update. The caller is
    /// responsible for `content` hashing to `id`.
    fn attach_content(
        &self,
        id: PropId,
        content: ProposalContent,
        attachment: Option<Attachment>,
    ) -> StorageResult<AttachOutcome>;

    /// Sets the execution fields. Returns the updated record, or `None` if none exists.
    fn record_execution(
        &self,
        id: PropId,
        execution: ExecutionRecord,
    ) -> StorageResult<Option<Proposal>>;

    /// Sets the soft-removal flag on behalf of an operator. Returns false if no record exists.
    fn set_removed(&self, id: PropId, removed: bool) -> StorageResult<bool>;

    /// Hides the proposal if it is still a visible stub created before `created_before`.
    /// Returns true if it was hidden.
    fn remove_if_stale(&self, id: PropId, created_before: Timestamp) -> StorageResult<bool>;

    /// Returns up to `limit` proposals matching `spec`, newest first. Proposals created at the
    /// same time are ordered by insertion, later first.
    fn proposals(&self, spec: &GetProposalsSpec, limit: usize) -> StorageResult<Vec<Proposal>>;

    /// Returns the ids of visible proposals without content created before `created_before`.
    fn stale_stubs(&self, created_before: Timestamp) -> StorageResult<Vec<PropId>>;
}

/// Fills creation fields missing from an existing record.
pub(crate) fn fill_creation(
    proposal: &mut Proposal,
    create_ts: Timestamp,
    create_tx_hash: Option<TxHash>,
) -> CreationOutcome {
    let mut changed = false;
    if proposal.create_ts.is_none() {
        proposal.create_ts = Some(create_ts);
        changed = true;
    }
    if proposal.create_tx_hash.is_none() && create_tx_hash.is_some() {
        proposal.create_tx_hash = create_tx_hash;
        changed = true;
    }
    if changed {
        CreationOutcome::Filled
    } else {
        CreationOutcome::Unchanged
    }
}

/// Attaches content to an existing record. The record is modified only on
/// [`AttachOutcome::Attached`].
pub(crate) fn apply_content(
    proposal: &mut Proposal,
    content: ProposalContent,
    attachment: Option<Attachment>,
) -> AttachOutcome {
    match &proposal.content {
        Some(existing) if *existing == content => AttachOutcome::AlreadyAttached(proposal.clone()),
        Some(existing) => AttachOutcome::Conflict(existing.clone()),
        None => {
            proposal.content = Some(content);
            proposal.attachment = attachment;
            if proposal.pruned {
                proposal.removed = false;
                proposal.pruned = false;
            }
            AttachOutcome::Attached(proposal.clone())
        }
    }
}

/// Sets the removal flag as an operator does. Returns true if the record changed.
pub(crate) fn apply_removal(proposal: &mut Proposal, removed: bool) -> bool {
    let changed = proposal.removed != removed || proposal.pruned;
    proposal.removed = removed;
    proposal.pruned = false;
    changed
}

/// Hides a stale stub. Returns true if the record changed.
pub(crate) fn apply_pruning(proposal: &mut Proposal, created_before: Timestamp) -> bool {
    if !is_stale_stub(proposal, created_before) {
        return false
    }
    proposal.removed = true;
    proposal.pruned = true;
    true
}

pub(crate) fn apply_execution(proposal: &mut Proposal, execution: ExecutionRecord) {
    proposal.status = Some(execution.status);
    if execution.tx_hash.is_some() {
        proposal.execute_tx_hash = execution.tx_hash;
    }
    if execution.ts.is_some() {
        proposal.execute_ts = execution.ts;
    }
}

pub(crate) fn is_stale_stub(proposal: &Proposal, created_before: Timestamp) -> bool {
    !proposal.removed &&
        !proposal.has_content() &&
        proposal.create_ts.is_some_and(|ts| ts < created_before)
}
