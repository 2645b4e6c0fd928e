use ornode_chain::{ChainError, DecodeError};
use ornode_storage::StorageError;

/// Errors applying an event.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The log or the proposal content is malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Reading the chain failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Writing the view failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A storage task panicked or was cancelled.
    #[error("storage task did not complete")]
    BlockingTask,
}

impl ReconcileError {
    /// Returns true if applying the event again may succeed.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Decode(_) => false,
            Self::Chain(err) => err.is_retryable(),
            Self::Storage(_) => true,
            Self::BlockingTask => false,
        }
    }
}
