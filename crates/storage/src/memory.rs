use crate::{
    page::{page, Stored},
    proposal::{
        apply_content, apply_execution, apply_pruning, apply_removal, fill_creation, is_stale_stub,
    },
    AttachOutcome, AwardStore, CreationOutcome, ExecutionRecord, ProposalStore, StorageResult,
    TickStore, VoteStore,
};
use alloy_primitives::{TxHash, U256};
use ornode_primitives::{
    Attachment, Award, AwardBurn, EventId, GetAwardsSpec, GetProposalsSpec, GetVotesSpec, PropId,
    Proposal, ProposalContent, Tick, Timestamp, Vote,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// In-memory view. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryOrDb {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    seq: u64,
    proposals: HashMap<PropId, Stored<Proposal>>,
    votes: HashMap<EventId, Stored<Vote>>,
    awards: HashMap<U256, Stored<Award>>,
    ticks: HashSet<EventId>,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }
}

impl MemoryOrDb {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProposalStore for MemoryOrDb {
    fn proposal(&self, id: PropId) -> StorageResult<Option<Proposal>> {
        Ok(self.inner.read().proposals.get(&id).map(|s| s.doc.clone()))
    }

    fn record_creation(
        &self,
        id: PropId,
        create_ts: Timestamp,
        create_tx_hash: Option<TxHash>,
    ) -> StorageResult<CreationOutcome> {
        let mut inner = self.inner.write();
        if let Some(stored) = inner.proposals.get_mut(&id) {
            return Ok(fill_creation(&mut stored.doc, create_ts, create_tx_hash))
        }
        let seq = inner.next_seq();
        inner
            .proposals
            .insert(id, Stored { seq, doc: Proposal::stub(id, create_ts, create_tx_hash) });
        Ok(CreationOutcome::Inserted)
    }

    fn attach_content(
        &self,
        id: PropId,
        content: ProposalContent,
        attachment: Option<Attachment>,
    ) -> StorageResult<AttachOutcome> {
        let mut inner = self.inner.write();
        Ok(match inner.proposals.get_mut(&id) {
            Some(stored) => apply_content(&mut stored.doc, content, attachment),
            None => AttachOutcome::NotFound,
        })
    }

    fn record_execution(
        &self,
        id: PropId,
        execution: ExecutionRecord,
    ) -> StorageResult<Option<Proposal>> {
        let mut inner = self.inner.write();
        Ok(inner.proposals.get_mut(&id).map(|stored| {
            apply_execution(&mut stored.doc, execution);
            stored.doc.clone()
        }))
    }

    fn set_removed(&self, id: PropId, removed: bool) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        let stored = inner.proposals.get_mut(&id);
        Ok(stored.map(|stored| apply_removal(&mut stored.doc, removed)).is_some())
    }

    fn remove_if_stale(&self, id: PropId, created_before: Timestamp) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        Ok(inner
            .proposals
            .get_mut(&id)
            .is_some_and(|stored| apply_pruning(&mut stored.doc, created_before)))
    }

    fn proposals(&self, spec: &GetProposalsSpec, limit: usize) -> StorageResult<Vec<Proposal>> {
        let inner = self.inner.read();
        Ok(page(inner.proposals.values().cloned(), |p| spec.matches(p), limit))
    }

    fn stale_stubs(&self, created_before: Timestamp) -> StorageResult<Vec<PropId>> {
        let inner = self.inner.read();
        Ok(inner
            .proposals
            .values()
            .filter(|s| is_stale_stub(&s.doc, created_before))
            .map(|s| s.doc.id)
            .collect())
    }
}

impl VoteStore for MemoryOrDb {
    fn insert_vote(&self, vote: Vote) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        if inner.votes.contains_key(&vote.event) {
            return Ok(false)
        }
        let seq = inner.next_seq();
        inner.votes.insert(vote.event, Stored { seq, doc: vote });
        Ok(true)
    }

    fn votes(&self, spec: &GetVotesSpec, limit: usize) -> StorageResult<Vec<Vote>> {
        let inner = self.inner.read();
        Ok(page(inner.votes.values().cloned(), |v| spec.matches(v), limit))
    }
}

impl AwardStore for MemoryOrDb {
    fn insert_award(&self, award: Award) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        if inner.awards.contains_key(&award.token_id) {
            return Ok(false)
        }
        let seq = inner.next_seq();
        inner.awards.insert(award.token_id, Stored { seq, doc: award });
        Ok(true)
    }

    fn award(&self, token_id: U256) -> StorageResult<Option<Award>> {
        Ok(self.inner.read().awards.get(&token_id).map(|s| s.doc.clone()))
    }

    fn set_burn(&self, token_id: U256, burn: AwardBurn) -> StorageResult<bool> {
        let mut inner = self.inner.write();
        Ok(inner.awards.get_mut(&token_id).map(|stored| stored.doc.burn = Some(burn)).is_some())
    }

    fn awards(&self, spec: &GetAwardsSpec, limit: usize) -> StorageResult<Vec<Award>> {
        let inner = self.inner.read();
        Ok(page(inner.awards.values().cloned(), |a| spec.matches(a), limit))
    }
}

impl TickStore for MemoryOrDb {
    fn insert_tick(&self, tick: Tick) -> StorageResult<bool> {
        Ok(self.inner.write().ticks.insert(tick.event))
    }

    fn tick_count(&self) -> StorageResult<u64> {
        Ok(self.inner.read().ticks.len() as u64)
    }
}
