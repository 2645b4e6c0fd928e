use crate::ReconcileError;
use ornode_chain::{decode_proposal, Contracts, DecodedProposal, MintContext};
use ornode_primitives::{AwardBurn, ExecStatus, Proposal};
use ornode_storage::AwardStore;
use tracing::{debug, warn};

/// Changes executing a proposal made to the award collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// Number of newly inserted awards.
    pub minted: usize,
    /// Whether a known award was marked burned.
    pub burned: bool,
}

/// Materializes the awards minted or burned by an executed proposal.
///
/// Does nothing for proposals that were not executed successfully or have no content yet. Safe to
/// repeat: awards are only inserted once and burning twice leaves the same record.
pub fn apply_effects<DB: AwardStore>(
    db: &DB,
    contracts: &Contracts,
    proposal: &Proposal,
) -> Result<Effects, ReconcileError> {
    if proposal.exec_status() != ExecStatus::Executed {
        return Ok(Effects::default())
    }
    let Some(content) = &proposal.content else { return Ok(Effects::default()) };

    let decoded = decode_proposal(content, proposal.attachment.as_ref(), contracts)?;
    if let DecodedProposal::BurnRespect { token_id, reason } = decoded {
        let burn = AwardBurn { tx_hash: proposal.execute_tx_hash, reason };
        let burned = db.set_burn(token_id, burn)?;
        if !burned {
            warn!(target: "ornode::reconciler", id = %proposal.id, %token_id, "Burned token is not a known award");
        }
        return Ok(Effects { minted: 0, burned })
    }

    let ctx = MintContext {
        ts: proposal.execute_ts.or(proposal.create_ts).unwrap_or_default(),
        tx_hash: proposal.execute_tx_hash,
    };
    let mut minted = 0;
    for award in decoded.awards(ctx)? {
        if db.insert_award(award)? {
            minted += 1;
        }
    }
    if minted > 0 {
        debug!(target: "ornode::reconciler", id = %proposal.id, kind = decoded.kind(), minted, "Materialized awards");
    }
    Ok(Effects { minted, burned: false })
}
