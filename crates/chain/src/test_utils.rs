//! In-memory chain and log builders.
#![allow(missing_docs)]

use crate::{abi::Orec, ChainError, ChainReader, Contracts, LogSource};
use alloy_primitives::{address, keccak256, Address, Bytes, LogData, TxHash, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use alloy_transport::TransportErrorKind;
use ornode_primitives::{
    ChainProposalState, ExecStatus, OrecParams, PropId, Stage, Timestamp, TokenIdData, VoteStatus,
    VoteType,
};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

pub const OREC_ADDRESS: Address = address!("0x5fbdb2315678afecb367f032d93f642f64180aa3");
pub const RESPECT_ADDRESS: Address = address!("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512");

/// Timestamp of block zero on the mock chain.
pub const GENESIS_TS: Timestamp = 1_700_000_000;

/// Contract addresses of the mock chain.
pub const fn contracts() -> Contracts {
    Contracts { orec: OREC_ADDRESS, respect: RESPECT_ADDRESS }
}

/// Timestamp the mock chain assigns to a block.
pub const fn block_ts(block: u64) -> Timestamp {
    GENESIS_TS + block * 12
}

/// Token id of a plain mint to `owner` in `period`.
pub fn token_id(period: u64, owner: Address) -> U256 {
    TokenIdData { mint_type: 0, period_number: period, owner }.pack()
}

/// Builds raw Orec logs at a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct LogBuilder {
    block: u64,
    log_index: u64,
    tx_hash: TxHash,
    timestamp: Option<Timestamp>,
}

impl LogBuilder {
    /// A log at `block` with the given index. The transaction hash is derived from the position.
    pub fn new(block: u64, log_index: u64) -> Self {
        let mut seed = [0u8; 16];
        seed[..8].copy_from_slice(&block.to_be_bytes());
        seed[8..].copy_from_slice(&log_index.to_be_bytes());
        Self { block, log_index, tx_hash: keccak256(seed), timestamp: Some(block_ts(block)) }
    }

    pub const fn tx_hash(mut self, tx_hash: TxHash) -> Self {
        self.tx_hash = tx_hash;
        self
    }

    /// Sets the block timestamp carried by the log. Many nodes do not report it.
    pub const fn timestamp(mut self, timestamp: Option<Timestamp>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn raw(self, data: LogData) -> Log {
        Log {
            inner: alloy_primitives::Log { address: OREC_ADDRESS, data },
            block_hash: None,
            block_number: Some(self.block),
            block_timestamp: self.timestamp,
            transaction_hash: Some(self.tx_hash),
            transaction_index: Some(0),
            log_index: Some(self.log_index),
            removed: false,
        }
    }

    pub fn proposal_created(self, prop_id: PropId) -> Log {
        self.raw(Orec::ProposalCreated { propId: prop_id }.encode_log_data())
    }

    pub fn vote(self, prop_id: PropId, voter: Address, vote: VoteType, weight: u64) -> Log {
        let vote = match vote {
            VoteType::Yes => 1,
            VoteType::No => 2,
        };
        self.raw(
            Orec::WeightedVoteIndexed { propId: prop_id, voter, vote, weight: U256::from(weight) }
                .encode_log_data(),
        )
    }

    pub fn executed(self, prop_id: PropId) -> Log {
        self.raw(Orec::Executed { propId: prop_id, retVal: Bytes::new() }.encode_log_data())
    }

    pub fn execution_failed(self, prop_id: PropId) -> Log {
        self.raw(Orec::ExecutionFailed { propId: prop_id, retVal: Bytes::new() }.encode_log_data())
    }

    pub fn signal(self, signal_type: u8, data: Bytes) -> Log {
        self.raw(Orec::Signal { signalType: signal_type, data }.encode_log_data())
    }
}

#[derive(Debug, Default)]
struct MockChainInner {
    proposals: HashMap<PropId, ChainProposalState>,
    block_timestamps: HashMap<u64, Timestamp>,
    logs: Vec<Log>,
    head: u64,
    params: Option<OrecParams>,
    failing_log_fetches: usize,
    failing_state_reads: usize,
    log_fetches: usize,
}

/// A chain kept in memory, implementing [`ChainReader`] and [`LogSource`].
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    inner: Arc<Mutex<MockChainInner>>,
}

impl MockChain {
    /// Registers a proposal created at `create_time`.
    pub fn add_proposal(&self, id: PropId, create_time: Timestamp) {
        self.set_proposal_state(
            id,
            ChainProposalState {
                create_time,
                yes_weight: U256::ZERO,
                no_weight: U256::ZERO,
                status: ExecStatus::NotExecuted,
                stage: Stage::Voting,
                vote_status: VoteStatus::Failing,
            },
        );
    }

    pub fn set_proposal_state(&self, id: PropId, state: ChainProposalState) {
        self.inner.lock().proposals.insert(id, state);
    }

    pub fn set_block_timestamp(&self, block: u64, ts: Timestamp) {
        self.inner.lock().block_timestamps.insert(block, ts);
    }

    pub fn set_params(&self, params: OrecParams) {
        self.inner.lock().params = Some(params);
    }

    pub fn set_head(&self, head: u64) {
        self.inner.lock().head = head;
    }

    /// Appends a log. The head advances to its block and the block's timestamp becomes known.
    pub fn push_log(&self, log: Log) {
        let mut inner = self.inner.lock();
        if let Some(block) = log.block_number {
            inner.head = inner.head.max(block);
            inner.block_timestamps.entry(block).or_insert_with(|| block_ts(block));
        }
        inner.logs.push(log);
    }

    /// Makes the next `n` log fetches fail.
    pub fn fail_log_fetches(&self, n: usize) {
        self.inner.lock().failing_log_fetches = n;
    }

    /// Makes the next `n` proposal state reads fail.
    pub fn fail_state_reads(&self, n: usize) {
        self.inner.lock().failing_state_reads = n;
    }

    /// Number of log fetches served so far, failed ones included.
    pub fn log_fetch_count(&self) -> usize {
        self.inner.lock().log_fetches
    }
}

fn injected(what: &str) -> ChainError {
    TransportErrorKind::custom_str(&format!("injected {what} failure")).into()
}

impl ChainReader for MockChain {
    async fn proposal_state(&self, id: PropId) -> Result<Option<ChainProposalState>, ChainError> {
        let mut inner = self.inner.lock();
        if inner.failing_state_reads > 0 {
            inner.failing_state_reads -= 1;
            return Err(injected("state read"))
        }
        Ok(inner.proposals.get(&id).cloned())
    }

    async fn orec_params(&self) -> Result<OrecParams, ChainError> {
        Ok(self.inner.lock().params.unwrap_or(OrecParams { vote_len: 259_200, veto_len: 172_800 }))
    }

    async fn block_timestamp(&self, block: u64) -> Result<Timestamp, ChainError> {
        self.inner
            .lock()
            .block_timestamps
            .get(&block)
            .copied()
            .ok_or(ChainError::BlockNotFound(block))
    }
}

impl LogSource for MockChain {
    async fn logs(&self, from: u64, to: u64) -> Result<Vec<Log>, ChainError> {
        let mut inner = self.inner.lock();
        inner.log_fetches += 1;
        if inner.failing_log_fetches > 0 {
            inner.failing_log_fetches -= 1;
            return Err(injected("log fetch"))
        }
        Ok(inner
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|n| (from..=to).contains(&n)))
            .cloned()
            .collect())
    }

    async fn latest_block(&self) -> Result<u64, ChainError> {
        Ok(self.inner.lock().head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn mock_serves_logs_by_range() {
        let chain = MockChain::default();
        chain.push_log(LogBuilder::new(5, 0).proposal_created(B256::ZERO));
        chain.push_log(LogBuilder::new(9, 0).executed(B256::ZERO));

        assert_eq!(chain.latest_block().await.unwrap(), 9);
        assert_eq!(chain.logs(0, 5).await.unwrap().len(), 1);
        assert_eq!(chain.logs(6, 9).await.unwrap().len(), 1);
        assert_eq!(chain.block_timestamp(9).await.unwrap(), block_ts(9));

        chain.fail_log_fetches(1);
        assert_matches!(chain.logs(0, 9).await, Err(ChainError::Transport(_)));
        assert_eq!(chain.logs(0, 9).await.unwrap().len(), 2);
        assert_eq!(chain.log_fetch_count(), 4);
    }

    #[tokio::test]
    async fn mock_reports_unknown_proposals() {
        let chain = MockChain::default();
        let id = B256::repeat_byte(3);
        assert_eq!(chain.proposal_state(id).await.unwrap(), None);

        chain.add_proposal(id, 42);
        assert_eq!(chain.proposal_state(id).await.unwrap().map(|s| s.create_time), Some(42));
    }
}
