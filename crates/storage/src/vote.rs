use crate::StorageResult;
use ornode_primitives::{GetVotesSpec, Vote};

/// Access to vote records. Votes are keyed by the event they were read from and never change.
#[auto_impl::auto_impl(&, Arc)]
pub trait VoteStore: Send + Sync {
    /// Inserts a vote unless one from the same event exists. Returns true if inserted.
    fn insert_vote(&self, vote: Vote) -> StorageResult<bool>;

    /// Returns up to `limit` votes matching `spec`, newest first.
    fn votes(&self, spec: &GetVotesSpec, limit: usize) -> StorageResult<Vec<Vote>>;
}
