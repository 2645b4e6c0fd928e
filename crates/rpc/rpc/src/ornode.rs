use crate::error::into_rpc_error;
use alloy_primitives::U256;
use async_trait::async_trait;
use jsonrpsee::core::RpcResult;
use ornode_chain::ChainReader;
use ornode_primitives::{
    Award, ChainProposalState, GetAwardsSpec, GetProposalsSpec, GetVotesSpec, OrecParams, PropId,
    Proposal, ProposalSubmission, PutProposalStatus, Vote,
};
use ornode_rpc_api::{OrnodeAdminApiServer, OrnodeApiServer};
use ornode_storage::OrDb;
use ornode_sync::ProposalSyncService;
use std::sync::Arc;
use tracing::trace;

/// `ornode` and `ornodeAdmin` API implementation.
///
/// Serves requests from a shared [`ProposalSyncService`].
pub struct OrnodeRpc<DB, C> {
    inner: Arc<ProposalSyncService<DB, C>>,
}

// === impl OrnodeRpc ===

impl<DB, C> OrnodeRpc<DB, C> {
    /// Create a new instance of the [`OrnodeRpc`]
    pub const fn new(service: Arc<ProposalSyncService<DB, C>>) -> Self {
        Self { inner: service }
    }

    /// The service answering requests.
    pub fn service(&self) -> &ProposalSyncService<DB, C> {
        &self.inner
    }
}

#[async_trait]
impl<DB, C> OrnodeApiServer for OrnodeRpc<DB, C>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader + 'static,
{
    /// Handler for `ornode_putProposal`
    async fn put_proposal(&self, proposal: ProposalSubmission) -> RpcResult<PutProposalStatus> {
        trace!(target: "ornode::rpc", id = %proposal.id, "Serving ornode_putProposal");
        self.inner.put_proposal(proposal).await.map_err(|err| into_rpc_error("putProposal", err))
    }

    /// Handler for `ornode_getProposal`
    async fn get_proposal(&self, id: PropId) -> RpcResult<Proposal> {
        self.inner.get_proposal(id).await.map_err(|err| into_rpc_error("getProposal", err))
    }

    /// Handler for `ornode_getProposals`
    async fn get_proposals(&self, spec: Option<GetProposalsSpec>) -> RpcResult<Vec<Proposal>> {
        let spec = spec.unwrap_or_default();
        self.inner.get_proposals(spec).await.map_err(|err| into_rpc_error("getProposals", err))
    }

    /// Handler for `ornode_getVotes`
    async fn get_votes(&self, spec: Option<GetVotesSpec>) -> RpcResult<Vec<Vote>> {
        let spec = spec.unwrap_or_default();
        self.inner.get_votes(spec).await.map_err(|err| into_rpc_error("getVotes", err))
    }

    /// Handler for `ornode_getAwards`
    async fn get_awards(&self, spec: Option<GetAwardsSpec>) -> RpcResult<Vec<Award>> {
        let spec = spec.unwrap_or_default();
        self.inner.get_awards(spec).await.map_err(|err| into_rpc_error("getAwards", err))
    }

    /// Handler for `ornode_getAward`
    async fn get_award(&self, token_id: U256) -> RpcResult<Award> {
        self.inner.get_award(token_id).await.map_err(|err| into_rpc_error("getAward", err))
    }

    /// Handler for `ornode_getPeriodNum`
    async fn get_period_num(&self) -> RpcResult<u64> {
        self.inner.get_period_num().await.map_err(|err| into_rpc_error("getPeriodNum", err))
    }

    /// Handler for `ornode_getChainState`
    async fn get_chain_state(&self, id: PropId) -> RpcResult<ChainProposalState> {
        self.inner.get_chain_state(id).await.map_err(|err| into_rpc_error("getChainState", err))
    }

    /// Handler for `ornode_getOrecParams`
    async fn get_orec_params(&self) -> RpcResult<OrecParams> {
        self.inner.get_orec_params().await.map_err(|err| into_rpc_error("getOrecParams", err))
    }
}

#[async_trait]
impl<DB, C> OrnodeAdminApiServer for OrnodeRpc<DB, C>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader + 'static,
{
    /// Handler for `ornodeAdmin_removeProposal`
    async fn remove_proposal(&self, id: PropId) -> RpcResult<()> {
        self.inner.remove_proposal(id).await.map_err(|err| into_rpc_error("removeProposal", err))
    }
}

impl<DB, C> std::fmt::Debug for OrnodeRpc<DB, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrnodeRpc").finish_non_exhaustive()
    }
}

impl<DB, C> Clone for OrnodeRpc<DB, C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}
