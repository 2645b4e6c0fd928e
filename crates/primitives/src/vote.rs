use crate::{EventId, PropId, Timestamp, UnknownCode};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Direction of a weighted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    /// Vote in favour.
    Yes,
    /// Vote against.
    No,
}

impl TryFrom<u8> for VoteType {
    type Error = UnknownCode;

    /// Decodes the Orec vote type. Code `0` ("none") is never emitted with weight and is rejected.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Yes),
            2 => Ok(Self::No),
            code => Err(UnknownCode { kind: "VoteType", code }),
        }
    }
}

/// A weighted vote observed on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Proposal voted on.
    pub proposal_id: PropId,
    /// Voting account.
    pub voter: Address,
    /// Direction of the vote.
    pub vote: VoteType,
    /// Weight the vote was counted with.
    pub weight: U256,
    /// Timestamp of the block containing the vote.
    pub ts: Timestamp,
    /// Event the vote was read from.
    pub event: EventId,
}
