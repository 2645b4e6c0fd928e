use crate::{abi::Orec, Contracts, DecodeError};
use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use ornode_primitives::{EventId, PropId, Timestamp, VoteType};

/// Signal type Orec uses for period ticks.
pub const TICK_SIGNAL: u8 = 0;

/// A decoded Orec event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    /// A proposal was registered.
    ProposalCreated {
        /// Proposal id.
        prop_id: PropId,
    },
    /// A weighted vote was cast.
    VoteIndexed {
        /// Proposal voted on.
        prop_id: PropId,
        /// Voting account.
        voter: Address,
        /// Direction of the vote.
        vote: VoteType,
        /// Weight the vote was counted with.
        weight: U256,
    },
    /// A proposal was executed successfully.
    Executed {
        /// Proposal id.
        prop_id: PropId,
    },
    /// Execution of a proposal reverted.
    ExecutionFailed {
        /// Proposal id.
        prop_id: PropId,
    },
    /// A signal was emitted.
    Signal {
        /// Signal type, [`TICK_SIGNAL`] for ticks.
        signal_type: u8,
        /// Signal payload.
        data: Bytes,
    },
}

impl ChainEvent {
    /// Returns the event name, for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => "ProposalCreated",
            Self::VoteIndexed { .. } => "WeightedVoteIndexed",
            Self::Executed { .. } => "Executed",
            Self::ExecutionFailed { .. } => "ExecutionFailed",
            Self::Signal { .. } => "Signal",
        }
    }
}

/// Position of a log on the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMeta {
    /// Transaction and log index.
    pub id: EventId,
    /// Block containing the log.
    pub block_number: u64,
    /// Timestamp of that block, when the log source reports it.
    pub block_timestamp: Option<Timestamp>,
}

/// A decoded event together with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLog {
    /// Position of the log.
    pub meta: EventMeta,
    /// The event.
    pub event: ChainEvent,
}

impl ChainLog {
    /// Decodes a raw log.
    ///
    /// Fails for logs removed by a reorg, pending logs and logs that are not Orec events.
    pub fn decode(log: &Log, contracts: &Contracts) -> Result<Self, DecodeError> {
        if log.removed {
            return Err(DecodeError::Removed)
        }
        if log.inner.address != contracts.orec {
            return Err(DecodeError::ForeignContract(log.inner.address))
        }
        let meta = EventMeta {
            id: EventId {
                tx_hash: log.transaction_hash.ok_or(DecodeError::MissingMeta("transaction hash"))?,
                log_index: log.log_index.ok_or(DecodeError::MissingMeta("log index"))?,
            },
            block_number: log.block_number.ok_or(DecodeError::MissingMeta("block number"))?,
            block_timestamp: log.block_timestamp,
        };
        let event = decode_event(log)?;
        Ok(Self { meta, event })
    }
}

fn decode_event(log: &Log) -> Result<ChainEvent, DecodeError> {
    let data = &log.inner.data;
    let Some(topic0) = data.topics().first().copied() else {
        return Err(DecodeError::UnknownEvent(None))
    };

    let event = if topic0 == Orec::ProposalCreated::SIGNATURE_HASH {
        let ev = Orec::ProposalCreated::decode_log_data(data)?;
        ChainEvent::ProposalCreated { prop_id: ev.propId }
    } else if topic0 == Orec::WeightedVoteIndexed::SIGNATURE_HASH {
        let ev = Orec::WeightedVoteIndexed::decode_log_data(data)?;
        ChainEvent::VoteIndexed {
            prop_id: ev.propId,
            voter: ev.voter,
            vote: VoteType::try_from(ev.vote)?,
            weight: ev.weight,
        }
    } else if topic0 == Orec::Executed::SIGNATURE_HASH {
        let ev = Orec::Executed::decode_log_data(data)?;
        ChainEvent::Executed { prop_id: ev.propId }
    } else if topic0 == Orec::ExecutionFailed::SIGNATURE_HASH {
        let ev = Orec::ExecutionFailed::decode_log_data(data)?;
        ChainEvent::ExecutionFailed { prop_id: ev.propId }
    } else if topic0 == Orec::Signal::SIGNATURE_HASH {
        let ev = Orec::Signal::decode_log_data(data)?;
        ChainEvent::Signal { signal_type: ev.signalType, data: ev.data }
    } else {
        return Err(DecodeError::UnknownEvent(Some(topic0)))
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{contracts, LogBuilder, OREC_ADDRESS, RESPECT_ADDRESS};
    use alloy_primitives::{address, LogData, B256};
    use assert_matches::assert_matches;

    #[test]
    fn decodes_vote() {
        let voter = address!("0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
        let log = LogBuilder::new(10, 2).vote(B256::repeat_byte(1), voter, VoteType::No, 40);
        let decoded = ChainLog::decode(&log, &contracts()).unwrap();

        assert_eq!(decoded.meta.block_number, 10);
        assert_eq!(decoded.meta.id.log_index, 2);
        assert_eq!(
            decoded.event,
            ChainEvent::VoteIndexed {
                prop_id: B256::repeat_byte(1),
                voter,
                vote: VoteType::No,
                weight: U256::from(40),
            }
        );
    }

    #[test]
    fn rejects_vote_without_direction() {
        let ev = Orec::WeightedVoteIndexed {
            propId: B256::ZERO,
            voter: Address::ZERO,
            vote: 0,
            weight: U256::from(1),
        };
        let log = LogBuilder::new(1, 0).raw(ev.encode_log_data());
        assert_matches!(ChainLog::decode(&log, &contracts()), Err(DecodeError::UnknownCode(_)));
    }

    #[test]
    fn rejects_unknown_signature() {
        let data = LogData::new_unchecked(vec![B256::repeat_byte(0xee)], Bytes::new());
        let log = LogBuilder::new(1, 0).raw(data);
        assert_matches!(
            ChainLog::decode(&log, &contracts()),
            Err(DecodeError::UnknownEvent(Some(_)))
        );
    }

    #[test]
    fn rejects_removed_and_pending_logs() {
        let mut log = LogBuilder::new(1, 0).proposal_created(B256::ZERO);
        log.removed = true;
        assert_matches!(ChainLog::decode(&log, &contracts()), Err(DecodeError::Removed));

        let mut log = LogBuilder::new(1, 0).proposal_created(B256::ZERO);
        log.block_number = None;
        assert_matches!(
            ChainLog::decode(&log, &contracts()),
            Err(DecodeError::MissingMeta("block number"))
        );
        assert_eq!(log.inner.address, OREC_ADDRESS);
    }

    #[test]
    fn rejects_logs_of_other_contracts() {
        let mut log = LogBuilder::new(1, 0).signal(TICK_SIGNAL, Bytes::new());
        log.inner.address = RESPECT_ADDRESS;
        assert_matches!(
            ChainLog::decode(&log, &contracts()),
            Err(DecodeError::ForeignContract(addr)) if addr == RESPECT_ADDRESS
        );
    }
}
