use crate::Timestamp;
use alloy_primitives::{Address, TxHash, B256, U256};
use serde::{Deserialize, Serialize};

/// Metadata of a minted respect token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    /// Token id, packing [`TokenIdData`].
    pub token_id: U256,
    /// Owner of the token.
    pub recipient: Address,
    /// Kind of mint, as encoded in the token id.
    pub mint_type: u8,
    /// Period the token was minted for.
    pub period_number: u64,
    /// Amount of respect the token represents.
    pub denomination: U256,
    /// Breakout group the award came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_num: Option<u32>,
    /// Rank within the breakout group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Reason given for the award.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Title of the award.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Timestamp of the block that minted the award.
    pub mint_ts: Timestamp,
    /// Transaction that minted the award.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_tx_hash: Option<TxHash>,
    /// Set once the award is burned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn: Option<AwardBurn>,
}

impl Award {
    /// Returns true if the award has been burned.
    pub const fn is_burned(&self) -> bool {
        self.burn.is_some()
    }
}

/// Details of a burn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBurn {
    /// Transaction that burned the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    /// Reason given for the burn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Errors when unpacking a token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenIdError {
    /// Bits between the mint type and the period number are not zero.
    #[error("token id {0} has reserved bits set")]
    ReservedBitsSet(U256),
}

/// Fields packed into a non-fungible respect token id.
///
/// Layout, most significant first: mint type (8 bits), reserved (24 bits), period number
/// (64 bits), owner address (160 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdData {
    /// Kind of mint.
    pub mint_type: u8,
    /// Period the token was minted for.
    pub period_number: u64,
    /// Owner of the token.
    pub owner: Address,
}

impl TokenIdData {
    /// Packs the fields into a token id.
    pub fn pack(&self) -> U256 {
        let mut bytes = [0u8; 32];
        bytes[0] = self.mint_type;
        bytes[4..12].copy_from_slice(&self.period_number.to_be_bytes());
        bytes[12..].copy_from_slice(self.owner.as_slice());
        U256::from_be_bytes(bytes)
    }

    /// Unpacks a token id.
    pub fn unpack(token_id: U256) -> Result<Self, TokenIdError> {
        let bytes = B256::from(token_id);
        if bytes[1..4] != [0u8; 3] {
            return Err(TokenIdError::ReservedBitsSet(token_id))
        }
        let mut period = [0u8; 8];
        period.copy_from_slice(&bytes[4..12]);
        Ok(Self {
            mint_type: bytes[0],
            period_number: u64::from_be_bytes(period),
            owner: Address::from_slice(&bytes[12..]),
        })
    }
}
