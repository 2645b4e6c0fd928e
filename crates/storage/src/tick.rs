use crate::StorageResult;
use ornode_primitives::Tick;

/// Access to period ticks.
#[auto_impl::auto_impl(&, Arc)]
pub trait TickStore: Send + Sync {
    /// Inserts a tick unless one from the same event exists. Returns true if inserted.
    fn insert_tick(&self, tick: Tick) -> StorageResult<bool>;

    /// Returns the number of recorded ticks, which is the current period number.
    fn tick_count(&self) -> StorageResult<u64>;
}
