//! Filters and pagination of the read side.
//!
//! All pages are newest first. `before` is an exclusive upper bound on the record timestamp and
//! `limit` is clamped by the server to its configured maximum.

use crate::{Award, ExecStatus, PropId, Proposal, Timestamp, Vote, VoteType};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Query for a page of proposals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetProposalsSpec {
    /// Only proposals created strictly before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Timestamp>,
    /// Requested page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Only proposals whose status is one of these.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_status_filter: Option<Vec<ExecStatus>>,
    /// Include soft-removed proposals.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_removed: bool,
}

impl GetProposalsSpec {
    /// Returns true if the proposal passes every filter of this query.
    pub fn matches(&self, proposal: &Proposal) -> bool {
        if proposal.removed && !self.include_removed {
            return false
        }
        if let Some(before) = self.before {
            match proposal.create_ts {
                Some(ts) if ts < before => {}
                _ => return false,
            }
        }
        if let Some(statuses) = &self.exec_status_filter {
            if !statuses.contains(&proposal.exec_status()) {
                return false
            }
        }
        true
    }
}

/// Query for a page of votes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetVotesSpec {
    /// Only votes cast strictly before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Timestamp>,
    /// Only votes on this proposal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop_filter: Option<PropId>,
    /// Only votes by this account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_filter: Option<Address>,
    /// Only votes with at least this weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<U256>,
    /// Only votes in this direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_type: Option<VoteType>,
    /// Requested page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl GetVotesSpec {
    /// Returns true if the vote passes every filter of this query.
    pub fn matches(&self, vote: &Vote) -> bool {
        self.before.is_none_or(|before| vote.ts < before) &&
            self.prop_filter.is_none_or(|id| vote.proposal_id == id) &&
            self.voter_filter.is_none_or(|voter| vote.voter == voter) &&
            self.min_weight.is_none_or(|min| vote.weight >= min) &&
            self.vote_type.is_none_or(|ty| vote.vote == ty)
    }
}

/// Query for a page of awards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAwardsSpec {
    /// Only awards minted strictly before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Timestamp>,
    /// Only awards owned by this account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
    /// Only burned (`true`) or only live (`false`) awards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burned: Option<bool>,
    /// Requested page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl GetAwardsSpec {
    /// Returns true if the award passes every filter of this query.
    pub fn matches(&self, award: &Award) -> bool {
        self.before.is_none_or(|before| award.mint_ts < before) &&
            self.recipient.is_none_or(|recipient| award.recipient == recipient) &&
            self.burned.is_none_or(|burned| award.is_burned() == burned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AwardBurn, EventId};
    use alloy_primitives::{B256, TxHash};
    use serde_json::json;

    fn proposal(ts: Timestamp) -> Proposal {
        Proposal::stub(B256::with_last_byte(ts as u8), ts, None)
    }

    #[test]
    fn proposals_before_is_exclusive() {
        let spec = GetProposalsSpec { before: Some(10), ..Default::default() };
        assert!(spec.matches(&proposal(9)));
        assert!(!spec.matches(&proposal(10)));
    }

    #[test]
    fn removed_proposals_are_hidden_by_default() {
        let mut removed = proposal(5);
        removed.removed = true;
        assert!(!GetProposalsSpec::default().matches(&removed));

        let spec = GetProposalsSpec { include_removed: true, ..Default::default() };
        assert!(spec.matches(&removed));
    }

    #[test]
    fn proposals_filter_by_status_set() {
        let mut executed = proposal(5);
        executed.status = Some(ExecStatus::Executed);
        let spec = GetProposalsSpec {
            exec_status_filter: Some(vec![ExecStatus::ExecutionFailed, ExecStatus::Executed]),
            ..Default::default()
        };
        assert!(spec.matches(&executed));
        assert!(!spec.matches(&proposal(5)));
    }

    #[test]
    fn votes_min_weight_and_type() {
        let vote = Vote {
            proposal_id: B256::ZERO,
            voter: Address::ZERO,
            vote: VoteType::No,
            weight: U256::from(100),
            ts: 3,
            event: EventId { tx_hash: TxHash::ZERO, log_index: 0 },
        };
        assert!(GetVotesSpec { min_weight: Some(U256::from(100)), ..Default::default() }
            .matches(&vote));
        assert!(!GetVotesSpec { min_weight: Some(U256::from(101)), ..Default::default() }
            .matches(&vote));
        assert!(!GetVotesSpec { vote_type: Some(VoteType::Yes), ..Default::default() }
            .matches(&vote));
    }

    #[test]
    fn awards_burned_filter() {
        let mut award = Award {
            token_id: U256::from(1),
            recipient: Address::ZERO,
            mint_type: 0,
            period_number: 1,
            denomination: U256::from(8),
            group_num: None,
            level: None,
            reason: None,
            title: None,
            mint_ts: 1,
            mint_tx_hash: None,
            burn: None,
        };
        let live_only = GetAwardsSpec { burned: Some(false), ..Default::default() };
        assert!(live_only.matches(&award));
        award.burn = Some(AwardBurn::default());
        assert!(!live_only.matches(&award));
        assert!(GetAwardsSpec::default().matches(&award));
    }

    #[test]
    fn queries_default_from_empty_object() {
        let spec: GetProposalsSpec = serde_json::from_value(json!({})).unwrap();
        assert_eq!(spec, GetProposalsSpec::default());

        let spec: GetVotesSpec =
            serde_json::from_value(json!({ "voteType": "Yes", "limit": 5 })).unwrap();
        assert_eq!(spec.vote_type, Some(VoteType::Yes));
        assert_eq!(spec.limit, Some(5));
    }
}
