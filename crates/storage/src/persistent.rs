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
use redb::{Database, Key, ReadableTable, ReadableTableMetadata, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, path::Path};
use tracing::debug;

const PROPOSALS: TableDefinition<'static, &[u8; 32], &[u8]> = TableDefinition::new("proposals");
const VOTES: TableDefinition<'static, &[u8; 40], &[u8]> = TableDefinition::new("votes");
const AWARDS: TableDefinition<'static, &[u8; 32], &[u8]> = TableDefinition::new("awards");
const TICKS: TableDefinition<'static, &[u8; 40], &[u8]> = TableDefinition::new("ticks");
const META: TableDefinition<'static, &str, u64> = TableDefinition::new("meta");

const SEQ_KEY: &str = "seq";

/// View persisted to a single redb file.
///
/// Documents are stored as JSON together with their insertion sequence number, which breaks
/// timestamp ties when paging.
pub struct RedbOrDb {
    db: Database,
}

impl fmt::Debug for RedbOrDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbOrDb").finish_non_exhaustive()
    }
}

impl RedbOrDb {
    /// Opens the database at `path`, creating the file and its tables if missing.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let db = Database::create(path)?;

        let tx = db.begin_write()?;
        tx.open_table(PROPOSALS)?;
        tx.open_table(VOTES)?;
        tx.open_table(AWARDS)?;
        tx.open_table(TICKS)?;
        tx.open_table(META)?;
        tx.commit()?;

        debug!(target: "ornode::storage", path = %path.display(), "Opened database");
        Ok(Self { db })
    }

    fn scan<K, T>(
        &self,
        table: TableDefinition<'_, K, &'static [u8]>,
    ) -> StorageResult<Vec<Stored<T>>>
    where
        K: Key + 'static,
        T: DeserializeOwned,
    {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(table)?;
        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            docs.push(decode(value.value())?);
        }
        Ok(docs)
    }

    /// Applies `f` to the stored proposal inside a write transaction, persisting it if `f`
    /// returns true.
    fn update_proposal<R>(
        &self,
        id: PropId,
        f: impl FnOnce(&mut Proposal) -> (bool, R),
    ) -> StorageResult<Option<R>> {
        let tx = self.db.begin_write()?;
        let result = {
            let mut table = tx.open_table(PROPOSALS)?;
            let stored: Option<Stored<Proposal>> = match table.get(&id.0)? {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
            match stored {
                Some(mut stored) => {
                    let (changed, result) = f(&mut stored.doc);
                    if changed {
                        table.insert(&id.0, encode(&stored)?.as_slice())?;
                    }
                    Some(result)
                }
                None => None,
            }
        };
        tx.commit()?;
        Ok(result)
    }
}

fn next_seq(tx: &WriteTransaction) -> StorageResult<u64> {
    let mut meta = tx.open_table(META)?;
    let seq = meta.get(SEQ_KEY)?.map(|v| v.value()).unwrap_or_default();
    meta.insert(SEQ_KEY, seq + 1)?;
    Ok(seq)
}

fn encode<T: Serialize>(stored: &Stored<T>) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(stored)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<Stored<T>> {
    Ok(serde_json::from_slice(bytes)?)
}

fn event_key(event: &EventId) -> [u8; 40] {
    let mut key = [0u8; 40];
    key[..32].copy_from_slice(event.tx_hash.as_slice());
    key[32..].copy_from_slice(&event.log_index.to_be_bytes());
    key
}

impl ProposalStore for RedbOrDb {
    fn proposal(&self, id: PropId) -> StorageResult<Option<Proposal>> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(PROPOSALS)?;
        let Some(value) = table.get(&id.0)? else { return Ok(None) };
        let stored: Stored<Proposal> = decode(value.value())?;
        Ok(Some(stored.doc))
    }

    fn record_creation(
        &self,
        id: PropId,
        create_ts: Timestamp,
        create_tx_hash: Option<TxHash>,
    ) -> StorageResult<CreationOutcome> {
        let tx = self.db.begin_write()?;
        let outcome = {
            let mut table = tx.open_table(PROPOSALS)?;
            let existing: Option<Stored<Proposal>> = match table.get(&id.0)? {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
            let (stored, outcome) = match existing {
                Some(mut stored) => {
                    let outcome = fill_creation(&mut stored.doc, create_ts, create_tx_hash);
                    (stored, outcome)
                }
                None => {
                    let seq = next_seq(&tx)?;
                    let doc = Proposal::stub(id, create_ts, create_tx_hash);
                    (Stored { seq, doc }, CreationOutcome::Inserted)
                }
            };
            if outcome != CreationOutcome::Unchanged {
                table.insert(&id.0, encode(&stored)?.as_slice())?;
            }
            outcome
        };
        tx.commit()?;
        Ok(outcome)
    }

    fn attach_content(
        &self,
        id: PropId,
        content: ProposalContent,
        attachment: Option<Attachment>,
    ) -> StorageResult<AttachOutcome> {
        let outcome = self.update_proposal(id, |proposal| {
            let outcome = apply_content(proposal, content, attachment);
            (matches!(outcome, AttachOutcome::Attached(_)), outcome)
        })?;
        Ok(outcome.unwrap_or(AttachOutcome::NotFound))
    }

    fn record_execution(
        &self,
        id: PropId,
        execution: ExecutionRecord,
    ) -> StorageResult<Option<Proposal>> {
        self.update_proposal(id, |proposal| {
            apply_execution(proposal, execution);
            (true, proposal.clone())
        })
    }

    fn set_removed(&self, id: PropId, removed: bool) -> StorageResult<bool> {
        let updated = self.update_proposal(id, |proposal| (apply_removal(proposal, removed), ()))?;
        Ok(updated.is_some())
    }

    fn remove_if_stale(&self, id: PropId, created_before: Timestamp) -> StorageResult<bool> {
        let pruned = self.update_proposal(id, |proposal| {
            let pruned = apply_pruning(proposal, created_before);
            (pruned, pruned)
        })?;
        Ok(pruned.unwrap_or(false))
    }

    fn proposals(&self, spec: &GetProposalsSpec, limit: usize) -> StorageResult<Vec<Proposal>> {
        Ok(page(self.scan(PROPOSALS)?, |p| spec.matches(p), limit))
    }

    fn stale_stubs(&self, created_before: Timestamp) -> StorageResult<Vec<PropId>> {
        let docs: Vec<Stored<Proposal>> = self.scan(PROPOSALS)?;
        Ok(docs
            .into_iter()
            .filter(|s| is_stale_stub(&s.doc, created_before))
            .map(|s| s.doc.id)
            .collect())
    }
}

impl VoteStore for RedbOrDb {
    fn insert_vote(&self, vote: Vote) -> StorageResult<bool> {
        let key = event_key(&vote.event);
        let tx = self.db.begin_write()?;
        let inserted = {
            let mut table = tx.open_table(VOTES)?;
            if table.get(&key)?.is_some() {
                false
            } else {
                let seq = next_seq(&tx)?;
                table.insert(&key, encode(&Stored { seq, doc: vote })?.as_slice())?;
                true
            }
        };
        tx.commit()?;
        Ok(inserted)
    }

    fn votes(&self, spec: &GetVotesSpec, limit: usize) -> StorageResult<Vec<Vote>> {
        Ok(page(self.scan(VOTES)?, |v| spec.matches(v), limit))
    }
}

impl AwardStore for RedbOrDb {
    fn insert_award(&self, award: Award) -> StorageResult<bool> {
        let key = award.token_id.to_be_bytes::<32>();
        let tx = self.db.begin_write()?;
        let inserted = {
            let mut table = tx.open_table(AWARDS)?;
            if table.get(&key)?.is_some() {
                false
            } else {
                let seq = next_seq(&tx)?;
                table.insert(&key, encode(&Stored { seq, doc: award })?.as_slice())?;
                true
            }
        };
        tx.commit()?;
        Ok(inserted)
    }

    fn award(&self, token_id: U256) -> StorageResult<Option<Award>> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(AWARDS)?;
        let Some(value) = table.get(&token_id.to_be_bytes::<32>())? else { return Ok(None) };
        let stored: Stored<Award> = decode(value.value())?;
        Ok(Some(stored.doc))
    }

    fn set_burn(&self, token_id: U256, burn: AwardBurn) -> StorageResult<bool> {
        let key = token_id.to_be_bytes::<32>();
        let tx = self.db.begin_write()?;
        let found = {
            let mut table = tx.open_table(AWARDS)?;
            let existing: Option<Stored<Award>> = match table.get(&key)? {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
            match existing {
                Some(mut stored) => {
                    stored.doc.burn = Some(burn);
                    table.insert(&key, encode(&stored)?.as_slice())?;
                    true
                }
                None => false,
            }
        };
        tx.commit()?;
        Ok(found)
    }

    fn awards(&self, spec: &GetAwardsSpec, limit: usize) -> StorageResult<Vec<Award>> {
        Ok(page(self.scan(AWARDS)?, |a| spec.matches(a), limit))
    }
}

impl TickStore for RedbOrDb {
    fn insert_tick(&self, tick: Tick) -> StorageResult<bool> {
        let key = event_key(&tick.event);
        let tx = self.db.begin_write()?;
        let inserted = {
            let mut table = tx.open_table(TICKS)?;
            if table.get(&key)?.is_some() {
                false
            } else {
                let seq = next_seq(&tx)?;
                table.insert(&key, encode(&Stored { seq, doc: tick })?.as_slice())?;
                true
            }
        };
        tx.commit()?;
        Ok(inserted)
    }

    fn tick_count(&self) -> StorageResult<u64> {
        let tx = self.db.begin_read()?;
        Ok(tx.open_table(TICKS)?.len()?)
    }
}
