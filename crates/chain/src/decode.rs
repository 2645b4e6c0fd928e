use crate::{
    abi::{
        Orec,
        Respect1155::{self, Respect1155Calls},
    },
    DecodeError, TICK_SIGNAL,
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{SolCall, SolInterface};
use ornode_primitives::{Attachment, Award, ProposalContent, Timestamp, TokenIdData};

/// Maximum number of members a breakout group mints to. The first member gets the highest level.
pub(crate) const MAX_BREAKOUT_MEMBERS: usize = 6;

/// Addresses of the deployed contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contracts {
    /// Orec contract.
    pub orec: Address,
    /// Respect1155 contract.
    pub respect: Address,
}

/// A single token mint requested by a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mint {
    /// Token id, packing the mint type, period and owner.
    pub token_id: U256,
    /// Amount of respect.
    pub amount: U256,
}

impl From<crate::abi::MintRequest> for Mint {
    fn from(req: crate::abi::MintRequest) -> Self {
        Self { token_id: req.id, amount: req.value }
    }
}

/// Where and when minted awards were created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintContext {
    /// Timestamp of the executing block.
    pub ts: Timestamp,
    /// Executing transaction.
    pub tx_hash: Option<TxHash>,
}

/// The action a proposal performs when executed, enriched with its attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedProposal {
    /// `mintRespectGroup` with ranked breakout members.
    RespectBreakout {
        /// Breakout group number from the attachment.
        group_num: Option<u32>,
        /// Mints, highest ranked member first.
        mints: Vec<Mint>,
    },
    /// `mintRespect` to a single account.
    RespectAccount {
        /// The mint.
        mint: Mint,
        /// Award title from the attachment.
        title: Option<String>,
        /// Award reason from the attachment.
        reason: Option<String>,
        /// Group number from the attachment.
        group_num: Option<u32>,
    },
    /// `burnRespect`.
    BurnRespect {
        /// Burned token.
        token_id: U256,
        /// Burn reason from the attachment.
        reason: Option<String>,
    },
    /// Orec `signal` with the tick signal type.
    Tick {
        /// Signal payload.
        data: Bytes,
    },
    /// Orec `signal` with any other signal type.
    CustomSignal {
        /// Signal type.
        signal_type: u8,
        /// Signal payload.
        data: Bytes,
    },
    /// Any other call.
    CustomCall,
}

impl DecodedProposal {
    /// Returns the attachment `propType` describing this action.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RespectBreakout { .. } => "respectBreakout",
            Self::RespectAccount { .. } => "respectAccount",
            Self::BurnRespect { .. } => "burnRespect",
            Self::Tick { .. } => "tick",
            Self::CustomSignal { .. } => "customSignal",
            Self::CustomCall => "customCall",
        }
    }

    /// Checks that every minted token id is well formed, so [`Self::awards`] cannot fail.
    pub fn check_mints(&self) -> Result<(), DecodeError> {
        let mints = match self {
            Self::RespectBreakout { mints, .. } => mints.as_slice(),
            Self::RespectAccount { mint, .. } => std::slice::from_ref(mint),
            _ => &[],
        };
        for mint in mints {
            TokenIdData::unpack(mint.token_id)?;
        }
        Ok(())
    }

    /// Returns the awards executing this proposal mints.
    pub fn awards(&self, ctx: MintContext) -> Result<Vec<Award>, DecodeError> {
        match self {
            Self::RespectBreakout { group_num, mints } => mints
                .iter()
                .enumerate()
                .map(|(rank, mint)| {
                    let level = (MAX_BREAKOUT_MEMBERS - rank) as u8;
                    new_award(mint, ctx, |award| {
                        award.group_num = *group_num;
                        award.level = Some(level);
                    })
                })
                .collect(),
            Self::RespectAccount { mint, title, reason, group_num } => {
                let award = new_award(mint, ctx, |award| {
                    award.title.clone_from(title);
                    award.reason.clone_from(reason);
                    award.group_num = *group_num;
                })?;
                Ok(vec![award])
            }
            Self::BurnRespect { .. } |
            Self::Tick { .. } |
            Self::CustomSignal { .. } |
            Self::CustomCall => Ok(Vec::new()),
        }
    }
}

fn new_award(
    mint: &Mint,
    ctx: MintContext,
    f: impl FnOnce(&mut Award),
) -> Result<Award, DecodeError> {
    let data = TokenIdData::unpack(mint.token_id)?;
    let mut award = Award {
        token_id: mint.token_id,
        recipient: data.owner,
        mint_type: data.mint_type,
        period_number: data.period_number,
        denomination: mint.amount,
        group_num: None,
        level: None,
        reason: None,
        title: None,
        mint_ts: ctx.ts,
        mint_tx_hash: ctx.tx_hash,
        burn: None,
    };
    f(&mut award);
    Ok(award)
}

/// Decodes the action `content` performs and checks that `attachment` describes the same action.
///
/// Calls that are neither Respect1155 mints or burns nor Orec signals decode to
/// [`DecodedProposal::CustomCall`].
pub fn decode_proposal(
    content: &ProposalContent,
    attachment: Option<&Attachment>,
    contracts: &Contracts,
) -> Result<DecodedProposal, DecodeError> {
    let decoded = decode_call(content, contracts)?;
    let Some(attachment) = attachment else { return Ok(decoded) };

    let enriched = match (decoded, attachment) {
        (
            DecodedProposal::RespectBreakout { mints, .. },
            Attachment::RespectBreakout { group_num, .. },
        ) => DecodedProposal::RespectBreakout { group_num: Some(*group_num), mints },
        (
            DecodedProposal::RespectAccount { mint, .. },
            Attachment::RespectAccount { mint_title, mint_reason, group_num, .. },
        ) => DecodedProposal::RespectAccount {
            mint,
            title: Some(mint_title.clone()),
            reason: mint_reason.clone(),
            group_num: *group_num,
        },
        (DecodedProposal::BurnRespect { token_id, .. }, Attachment::BurnRespect { burn_reason, .. }) => {
            DecodedProposal::BurnRespect { token_id, reason: burn_reason.clone() }
        }
        (decoded @ DecodedProposal::Tick { .. }, Attachment::Tick { .. }) |
        (decoded @ DecodedProposal::CustomSignal { .. }, Attachment::CustomSignal { .. }) |
        (decoded @ DecodedProposal::CustomCall, Attachment::CustomCall { .. }) => decoded,
        (decoded, attachment) => {
            return Err(DecodeError::AttachmentMismatch {
                attachment: attachment.prop_type(),
                content: decoded.kind(),
            })
        }
    };
    Ok(enriched)
}

fn decode_call(
    content: &ProposalContent,
    contracts: &Contracts,
) -> Result<DecodedProposal, DecodeError> {
    if content.addr == contracts.respect {
        let Ok(call) = Respect1155Calls::abi_decode(&content.cdata) else {
            return Ok(DecodedProposal::CustomCall)
        };
        return match call {
            Respect1155Calls::mintRespectGroup(call) => {
                if call.requests.len() > MAX_BREAKOUT_MEMBERS {
                    return Err(DecodeError::TooManyBreakoutMembers(call.requests.len()))
                }
                Ok(DecodedProposal::RespectBreakout {
                    group_num: None,
                    mints: call.requests.into_iter().map(Mint::from).collect(),
                })
            }
            Respect1155Calls::mintRespect(call) => Ok(DecodedProposal::RespectAccount {
                mint: call.request.into(),
                title: None,
                reason: None,
                group_num: None,
            }),
            Respect1155Calls::burnRespect(call) => {
                Ok(DecodedProposal::BurnRespect { token_id: call.tokenId, reason: None })
            }
        }
    }

    if content.addr == contracts.orec && content.cdata.starts_with(&Orec::signalCall::SELECTOR) {
        let call = Orec::signalCall::abi_decode(&content.cdata)?;
        return Ok(if call.signalType == TICK_SIGNAL {
            DecodedProposal::Tick { data: call.data }
        } else {
            DecodedProposal::CustomSignal { signal_type: call.signalType, data: call.data }
        })
    }

    Ok(DecodedProposal::CustomCall)
}

/// Calldata helpers for building proposals.
impl Contracts {
    /// Content minting `mints` to a breakout group, highest ranked member first.
    pub fn breakout_content(&self, mints: &[Mint], memo: Bytes) -> ProposalContent {
        let call = Respect1155::mintRespectGroupCall {
            requests: mints
                .iter()
                .map(|m| crate::abi::MintRequest { id: m.token_id, value: m.amount })
                .collect(),
            data: Bytes::new(),
        };
        ProposalContent { addr: self.respect, cdata: call.abi_encode().into(), memo }
    }

    /// Content minting a single token.
    pub fn account_content(&self, mint: Mint, memo: Bytes) -> ProposalContent {
        let call = Respect1155::mintRespectCall {
            request: crate::abi::MintRequest { id: mint.token_id, value: mint.amount },
            data: Bytes::new(),
        };
        ProposalContent { addr: self.respect, cdata: call.abi_encode().into(), memo }
    }

    /// Content burning a token.
    pub fn burn_content(&self, token_id: U256, memo: Bytes) -> ProposalContent {
        let call = Respect1155::burnRespectCall { tokenId: token_id, data: Bytes::new() };
        ProposalContent { addr: self.respect, cdata: call.abi_encode().into(), memo }
    }

    /// Content emitting an Orec signal.
    pub fn signal_content(&self, signal_type: u8, data: Bytes, memo: Bytes) -> ProposalContent {
        let call = Orec::signalCall { signalType: signal_type, data };
        ProposalContent { addr: self.orec, cdata: call.abi_encode().into(), memo }
    }
}
