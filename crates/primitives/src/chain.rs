use crate::{ExecStatus, Timestamp, UnknownCode};
use alloy_primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a proposal in the Orec voting timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Yes and no votes are accepted.
    Voting,
    /// Only no votes are accepted.
    Veto,
    /// The proposal can be executed.
    Execution,
    /// The proposal can no longer be executed.
    Expired,
}

impl TryFrom<u8> for Stage {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Voting),
            1 => Ok(Self::Veto),
            2 => Ok(Self::Execution),
            3 => Ok(Self::Expired),
            code => Err(UnknownCode { kind: "Stage", code }),
        }
    }
}

/// Vote outcome of a proposal as computed by Orec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteStatus {
    /// Voting is ongoing and the proposal would pass.
    Passing,
    /// Voting is ongoing and the proposal would fail.
    Failing,
    /// Voting ended and the proposal passed.
    Passed,
    /// Voting ended and the proposal failed.
    Failed,
}

impl TryFrom<u8> for VoteStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Passing),
            1 => Ok(Self::Failing),
            2 => Ok(Self::Passed),
            3 => Ok(Self::Failed),
            code => Err(UnknownCode { kind: "VoteStatus", code }),
        }
    }
}

/// Live state of a proposal read from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainProposalState {
    /// Creation time.
    pub create_time: Timestamp,
    /// Accumulated yes weight.
    pub yes_weight: U256,
    /// Accumulated no weight.
    pub no_weight: U256,
    /// Execution status.
    pub status: ExecStatus,
    /// Current stage.
    pub stage: Stage,
    /// Current vote status.
    pub vote_status: VoteStatus,
}

/// Timing parameters of the Orec contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrecParams {
    /// Length of the voting stage in seconds.
    pub vote_len: u64,
    /// Length of the veto stage in seconds.
    pub veto_len: u64,
}

/// Identifies a single log emitted on-chain.
///
/// Used as the natural key of append-only records so that redelivering the same event never
/// produces a second record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    /// Transaction that emitted the log.
    pub tx_hash: TxHash,
    /// Index of the log within its block.
    pub log_index: u64,
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.log_index)
    }
}
