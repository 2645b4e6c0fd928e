use crate::{Attachment, Timestamp, UnknownCode};
use alloy_primitives::{keccak256, Address, Bytes, TxHash, B256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// Identifier of an Orec proposal, the commitment `keccak256(abi.encode(Message))`.
pub type PropId = B256;

mod abi {
    #![allow(missing_docs, unreachable_pub)]

    alloy_sol_types::sol! {
        struct Message {
            address addr;
            bytes cdata;
            bytes memo;
        }
    }
}

/// Computes the proposal id the Orec contract derives for a call to `addr` with `cdata` and
/// `memo`.
pub fn proposal_id(addr: Address, cdata: &Bytes, memo: &Bytes) -> PropId {
    let message = abi::Message { addr, cdata: cdata.clone(), memo: memo.clone() };
    keccak256(message.abi_encode())
}

/// The part of a proposal that is committed to on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalContent {
    /// Contract the proposal calls when executed.
    pub addr: Address,
    /// Calldata of the call.
    pub cdata: Bytes,
    /// Free-form memo, part of the commitment.
    pub memo: Bytes,
}

impl ProposalContent {
    /// Returns the id this content hashes to.
    pub fn id(&self) -> PropId {
        proposal_id(self.addr, &self.cdata, &self.memo)
    }
}

/// Execution outcome of a proposal as reported by Orec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecStatus {
    /// Not executed yet.
    NotExecuted,
    /// Executed successfully.
    Executed,
    /// Execution was attempted and reverted.
    ExecutionFailed,
}

impl TryFrom<u8> for ExecStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotExecuted),
            1 => Ok(Self::Executed),
            2 => Ok(Self::ExecutionFailed),
            code => Err(UnknownCode { kind: "ExecStatus", code }),
        }
    }
}

/// A proposal as mirrored by the node.
///
/// A record is created as a stub the moment the chain reports the proposal; content and the
/// attachment are filled in once a client submits content hashing to [`Proposal::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Proposal id.
    pub id: PropId,
    /// Committed content, once submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ProposalContent>,
    /// Descriptive metadata submitted together with the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Creation time reported by the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_ts: Option<Timestamp>,
    /// Transaction that created the proposal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_tx_hash: Option<TxHash>,
    /// Transaction that executed the proposal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_tx_hash: Option<TxHash>,
    /// Timestamp of the block the proposal was executed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_ts: Option<Timestamp>,
    /// Execution status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecStatus>,
    /// Set when the proposal is hidden from listings.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
    /// Set together with `removed` when the proposal was hidden as a stale stub rather than by an
    /// operator. Submitting content makes such a proposal visible again.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pruned: bool,
}

impl Proposal {
    /// Creates a stub for a proposal observed on-chain without content.
    pub const fn stub(id: PropId, create_ts: Timestamp, create_tx_hash: Option<TxHash>) -> Self {
        Self {
            id,
            content: None,
            attachment: None,
            create_ts: Some(create_ts),
            create_tx_hash,
            execute_tx_hash: None,
            execute_ts: None,
            status: Some(ExecStatus::NotExecuted),
            removed: false,
            pruned: false,
        }
    }

    /// Returns true if content has been attached.
    pub const fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Returns the effective execution status, treating an unknown status as not executed.
    pub fn exec_status(&self) -> ExecStatus {
        self.status.unwrap_or(ExecStatus::NotExecuted)
    }
}

/// Content submitted by a client for an on-chain proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSubmission {
    /// Id the client claims the content hashes to.
    pub id: PropId,
    /// The committed content.
    pub content: ProposalContent,
    /// Descriptive metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl ProposalSubmission {
    /// Returns true if the content hashes to the asserted id.
    pub fn has_valid_id(&self) -> bool {
        self.content.id() == self.id
    }
}

/// Successful outcomes of submitting proposal content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PutProposalStatus {
    /// Content was attached to the on-chain proposal.
    ProposalStored,
    /// Identical content was already attached.
    ProposalExists,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};

    fn content() -> ProposalContent {
        ProposalContent {
            addr: address!("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
            cdata: bytes!("0x6c2b6c44"),
            memo: bytes!("0x"),
        }
    }

    #[test]
    fn id_is_deterministic() {
        assert_eq!(content().id(), content().id());
        assert_eq!(content().id(), proposal_id(content().addr, &content().cdata, &content().memo));
    }

    #[test]
    fn id_commits_to_every_field() {
        let base = content().id();

        let mut other = content();
        other.memo = bytes!("0x01");
        assert_ne!(other.id(), base);

        let mut other = content();
        other.cdata = bytes!("0x6c2b6c45");
        assert_ne!(other.id(), base);

        let mut other = content();
        other.addr = Address::ZERO;
        assert_ne!(other.id(), base);
    }

    #[test]
    fn id_distinguishes_field_boundaries() {
        // abi encoding length-prefixes dynamic fields, so moving bytes between cdata and memo
        // must produce a different commitment
        let a = ProposalContent { addr: Address::ZERO, cdata: bytes!("0x0102"), memo: bytes!("0x03") };
        let b = ProposalContent { addr: Address::ZERO, cdata: bytes!("0x01"), memo: bytes!("0x0203") };
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn submission_checks_asserted_id() {
        let content = content();
        let valid = ProposalSubmission { id: content.id(), content: content.clone(), attachment: None };
        assert!(valid.has_valid_id());

        let invalid = ProposalSubmission { id: B256::repeat_byte(0xab), content, attachment: None };
        assert!(!invalid.has_valid_id());
    }

    #[test]
    fn stub_serializes_without_content() {
        let stub = Proposal::stub(B256::repeat_byte(1), 1_700_000_000, None);
        let json = serde_json::to_value(&stub).unwrap();
        assert!(json.get("content").is_none());
        assert!(json.get("removed").is_none());
        assert!(json.get("pruned").is_none());
        assert_eq!(json["createTs"], 1_700_000_000u64);
        assert_eq!(json["status"], "NotExecuted");

        let back: Proposal = serde_json::from_value(json).unwrap();
        assert_eq!(back, stub);
    }

    #[test]
    fn exec_status_codes() {
        assert_eq!(ExecStatus::try_from(1), Ok(ExecStatus::Executed));
        assert_eq!(ExecStatus::try_from(3), Err(UnknownCode { kind: "ExecStatus", code: 3 }));
    }
}
