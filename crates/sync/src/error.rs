use alloy_primitives::U256;
use ornode_chain::{ChainError, DecodeError};
use ornode_primitives::{ErrorKind, PropId};
use ornode_reconciler::ReconcileError;
use ornode_storage::StorageError;

/// Result alias for [`SyncError`].
pub type SyncResult<T> = Result<T, SyncError>;

/// Why submitted content was rejected.
#[derive(Debug, thiserror::Error)]
pub enum InvalidProposal {
    /// The content hashes to a different id than the one asserted.
    #[error("content hashes to {computed}, not {asserted}")]
    IdMismatch {
        /// Id sent by the client.
        asserted: PropId,
        /// Id the content hashes to.
        computed: PropId,
    },
    /// The content or its attachment does not decode consistently.
    #[error(transparent)]
    Content(#[from] DecodeError),
}

/// Errors of the [`ProposalSyncService`](crate::ProposalSyncService).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No proposal with this id is known.
    #[error("proposal {0} not found")]
    ProposalNotFound(PropId),
    /// The proposal does not exist on-chain.
    #[error("proposal {0} was not created on-chain")]
    ProposalNotCreated(PropId),
    /// The submission is invalid.
    #[error("invalid proposal: {0}")]
    ProposalInvalid(#[from] InvalidProposal),
    /// No award with this token id is known.
    #[error("token {0} not found")]
    TokenNotFound(U256),
    /// The stored record contradicts itself or the submission in a way that cannot happen for
    /// consistent data.
    #[error("inconsistent record for proposal {id}: {reason}")]
    Inconsistent {
        /// Proposal id.
        id: PropId,
        /// What is inconsistent.
        reason: &'static str,
    },
    /// Reading the chain failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Accessing the view failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Materializing awards failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    /// A storage task panicked or was cancelled.
    #[error("storage task did not complete")]
    BlockingTask,
}

impl SyncError {
    /// Returns the kind reported to clients.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) => ErrorKind::ProposalNotFound,
            Self::ProposalNotCreated(_) => ErrorKind::ProposalNotCreated,
            Self::ProposalInvalid(_) => ErrorKind::ProposalInvalid,
            Self::TokenNotFound(_) => ErrorKind::TokenNotFound,
            Self::Inconsistent { .. } |
            Self::Chain(_) |
            Self::Storage(_) |
            Self::Reconcile(_) |
            Self::BlockingTask => ErrorKind::Internal,
        }
    }
}
