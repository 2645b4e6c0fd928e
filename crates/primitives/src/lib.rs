//! Commonly used types in ornode.
//!
//! This crate contains the documents the node persists (proposals, votes, awards and ticks), the
//! proposal commitment scheme shared with the Orec contract, and the query specifications used by
//! the read side of the node.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod attachment;
mod award;
mod chain;
mod error;
mod proposal;
mod query;
mod tick;
mod vote;

pub use attachment::Attachment;
pub use award::{Award, AwardBurn, TokenIdData, TokenIdError};
pub use chain::{ChainProposalState, EventId, OrecParams, Stage, VoteStatus};
pub use error::ErrorKind;
pub use proposal::{
    proposal_id, ExecStatus, PropId, Proposal, ProposalContent, ProposalSubmission,
    PutProposalStatus,
};
pub use query::{GetAwardsSpec, GetProposalsSpec, GetVotesSpec};
pub use tick::Tick;
pub use vote::{Vote, VoteType};

/// Unix timestamp in seconds, as reported by block headers and the Orec contract.
pub type Timestamp = u64;

/// Error returned when a numeric code read from the chain has no corresponding enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    /// Name of the enum being decoded.
    pub kind: &'static str,
    /// The offending value.
    pub code: u8,
}
