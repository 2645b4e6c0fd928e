use crate::StorageResult;
use alloy_primitives::U256;
use ornode_primitives::{Award, AwardBurn, GetAwardsSpec};

/// Access to award records, keyed by token id.
#[auto_impl::auto_impl(&, Arc)]
pub trait AwardStore: Send + Sync {
    /// Inserts an award unless one with the same token id exists. Returns true if inserted.
    fn insert_award(&self, award: Award) -> StorageResult<bool>;

    /// Returns the award with the given token id.
    fn award(&self, token_id: U256) -> StorageResult<Option<Award>>;

    /// Marks an award burned. Returns false if the award is unknown.
    fn set_burn(&self, token_id: U256, burn: AwardBurn) -> StorageResult<bool>;

    /// Returns up to `limit` awards matching `spec`, newest first.
    fn awards(&self, spec: &GetAwardsSpec, limit: usize) -> StorageResult<Vec<Award>>;
}
