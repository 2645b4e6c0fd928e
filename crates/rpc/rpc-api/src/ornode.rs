use alloy_primitives::U256;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use ornode_primitives::{
    Award, ChainProposalState, GetAwardsSpec, GetProposalsSpec, GetVotesSpec, OrecParams, PropId,
    Proposal, ProposalSubmission, PutProposalStatus, Vote,
};

/// Proposal submission and read access to the node's view of the Orec contract.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "ornode"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "ornode"))]
pub trait OrnodeApi {
    /// Stores the content of a proposal created on-chain.
    #[method(name = "putProposal")]
    async fn put_proposal(&self, proposal: ProposalSubmission) -> RpcResult<PutProposalStatus>;

    /// Returns a proposal by id.
    #[method(name = "getProposal")]
    async fn get_proposal(&self, id: PropId) -> RpcResult<Proposal>;

    /// Returns a page of proposals, newest first.
    #[method(name = "getProposals")]
    async fn get_proposals(&self, spec: Option<GetProposalsSpec>) -> RpcResult<Vec<Proposal>>;

    /// Returns a page of votes, newest first.
    #[method(name = "getVotes")]
    async fn get_votes(&self, spec: Option<GetVotesSpec>) -> RpcResult<Vec<Vote>>;

    /// Returns a page of awards, newest first.
    #[method(name = "getAwards")]
    async fn get_awards(&self, spec: Option<GetAwardsSpec>) -> RpcResult<Vec<Award>>;

    /// Returns an award by token id.
    #[method(name = "getAward")]
    async fn get_award(&self, token_id: U256) -> RpcResult<Award>;

    /// Returns the current period number.
    #[method(name = "getPeriodNum")]
    async fn get_period_num(&self) -> RpcResult<u64>;

    /// Returns the live on-chain state of a proposal.
    #[method(name = "getChainState")]
    async fn get_chain_state(&self, id: PropId) -> RpcResult<ChainProposalState>;

    /// Returns the Orec voting period lengths.
    #[method(name = "getOrecParams")]
    async fn get_orec_params(&self) -> RpcResult<OrecParams>;
}

/// Administrative operations, served only when enabled.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "ornodeAdmin"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "ornodeAdmin"))]
pub trait OrnodeAdminApi {
    /// Hides a proposal from listings that do not ask for removed proposals.
    #[method(name = "removeProposal")]
    async fn remove_proposal(&self, id: PropId) -> RpcResult<()>;
}
