use crate::{EventId, Timestamp};
use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// A period advance signalled on-chain. The number of ticks is the current period number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    /// Event the tick was read from.
    pub event: EventId,
    /// Block containing the tick.
    pub block_number: u64,
    /// Timestamp of that block.
    pub ts: Timestamp,
}

impl Tick {
    /// Transaction that emitted the tick.
    pub const fn tx_hash(&self) -> TxHash {
        self.event.tx_hash
    }
}
