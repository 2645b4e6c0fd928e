use crate::{abi::Orec, ChainError, Contracts};
use alloy_primitives::Address;
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter, Log};
use ornode_primitives::{
    ChainProposalState, ExecStatus, OrecParams, PropId, Stage, Timestamp, VoteStatus,
};
use std::future::Future;
use url::Url;

/// Read-only view of the Orec contract.
#[auto_impl::auto_impl(&, Arc)]
pub trait ChainReader: Send + Sync {
    /// Returns the live state of a proposal, or `None` if Orec does not know it.
    fn proposal_state(
        &self,
        id: PropId,
    ) -> impl Future<Output = Result<Option<ChainProposalState>, ChainError>> + Send;

    /// Returns the voting period lengths.
    fn orec_params(&self) -> impl Future<Output = Result<OrecParams, ChainError>> + Send;

    /// Returns the timestamp of a block.
    fn block_timestamp(
        &self,
        block: u64,
    ) -> impl Future<Output = Result<Timestamp, ChainError>> + Send;
}

/// Source of historical Orec logs.
#[auto_impl::auto_impl(&, Arc)]
pub trait LogSource: Send + Sync {
    /// Returns the Orec logs emitted in blocks `from..=to`.
    fn logs(&self, from: u64, to: u64) -> impl Future<Output = Result<Vec<Log>, ChainError>> + Send;

    /// Returns the number of the latest block.
    fn latest_block(&self) -> impl Future<Output = Result<u64, ChainError>> + Send;
}

/// [`RpcChain`] over HTTP.
pub type HttpChain = RpcChain<RootProvider>;

/// [`ChainReader`] and [`LogSource`] over an alloy provider.
#[derive(Debug, Clone)]
pub struct RpcChain<P> {
    provider: P,
    contracts: Contracts,
}

impl RpcChain<RootProvider> {
    /// Connects to a node over HTTP.
    pub fn connect_http(url: Url, contracts: Contracts) -> Self {
        Self::new(RootProvider::new_http(url), contracts)
    }
}

impl<P> RpcChain<P> {
    /// Creates a reader over the given provider.
    pub const fn new(provider: P, contracts: Contracts) -> Self {
        Self { provider, contracts }
    }

    /// Returns the contract addresses.
    pub const fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    const fn orec(&self) -> Address {
        self.contracts.orec
    }
}

impl<P: Provider> ChainReader for RpcChain<P> {
    async fn proposal_state(&self, id: PropId) -> Result<Option<ChainProposalState>, ChainError> {
        let orec = Orec::new(self.orec(), &self.provider);
        let prop = orec.proposals(id).call().await?;
        if prop.createTime.is_zero() {
            return Ok(None)
        }
        let stage = orec.getStage(id).call().await?;
        let vote_status = orec.getVoteStatus(id).call().await?;

        Ok(Some(ChainProposalState {
            create_time: prop.createTime.saturating_to(),
            yes_weight: prop.yesWeight,
            no_weight: prop.noWeight,
            status: ExecStatus::try_from(prop.status)?,
            stage: Stage::try_from(stage)?,
            vote_status: VoteStatus::try_from(vote_status)?,
        }))
    }

    async fn orec_params(&self) -> Result<OrecParams, ChainError> {
        let orec = Orec::new(self.orec(), &self.provider);
        let vote_len = orec.voteLen().call().await?;
        let veto_len = orec.vetoLen().call().await?;
        Ok(OrecParams { vote_len, veto_len })
    }

    async fn block_timestamp(&self, number: u64) -> Result<Timestamp, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?
            .ok_or(ChainError::BlockNotFound(number))?;
        Ok(block.header.timestamp)
    }
}

impl<P: Provider> LogSource for RpcChain<P> {
    async fn logs(&self, from: u64, to: u64) -> Result<Vec<Log>, ChainError> {
        let filter = Filter::new().address(self.orec()).from_block(from).to_block(to);
        Ok(self.provider.get_logs(&filter).await?)
    }

    async fn latest_block(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?)
    }
}
