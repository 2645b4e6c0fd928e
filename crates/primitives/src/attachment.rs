use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Off-chain metadata describing a proposal, tagged by the kind of action it performs.
///
/// The chain never sees the attachment; it is validated against the decoded proposal content
/// when submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "propType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Attachment {
    /// Mints the consensus result of a breakout room.
    RespectBreakout {
        /// Breakout group number.
        group_num: u32,
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
        /// Salt used to make otherwise identical proposals distinct.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        salt: Option<B256>,
    },
    /// Mints respect to a single account.
    RespectAccount {
        /// Title stored with the award.
        mint_title: String,
        /// Reason stored with the award.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mint_reason: Option<String>,
        /// Group number, if the mint relates to a breakout group.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_num: Option<u32>,
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
    },
    /// Burns a previously minted award.
    BurnRespect {
        /// Reason stored with the burn.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        burn_reason: Option<String>,
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
    },
    /// Advances the period counter.
    Tick {
        /// Link to further information.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
    },
    /// Emits an application defined signal.
    CustomSignal {
        /// Link to further information.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
    },
    /// Performs an arbitrary call.
    CustomCall {
        /// Proposal title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_title: Option<String>,
        /// Proposal description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prop_description: Option<String>,
    },
}

impl Attachment {
    /// Returns the `propType` tag.
    pub const fn prop_type(&self) -> &'static str {
        match self {
            Self::RespectBreakout { .. } => "respectBreakout",
            Self::RespectAccount { .. } => "respectAccount",
            Self::BurnRespect { .. } => "burnRespect",
            Self::Tick { .. } => "tick",
            Self::CustomSignal { .. } => "customSignal",
            Self::CustomCall { .. } => "customCall",
        }
    }

    /// Returns the proposal title, if any.
    pub fn prop_title(&self) -> Option<&str> {
        match self {
            Self::RespectBreakout { prop_title, .. } |
            Self::RespectAccount { prop_title, .. } |
            Self::BurnRespect { prop_title, .. } |
            Self::Tick { prop_title, .. } |
            Self::CustomSignal { prop_title, .. } |
            Self::CustomCall { prop_title, .. } => prop_title.as_deref(),
        }
    }
}
