use ornode_chain::ChainError;
use ornode_reconciler::ReconcileError;

/// Errors aborting a backfill.
#[derive(Debug, thiserror::Error)]
pub enum BackfillError {
    /// The range ends before it starts.
    #[error("invalid range {from}..={to}")]
    InvalidRange {
        /// First block.
        from: u64,
        /// Last block.
        to: u64,
    },
    /// The chain head could not be read.
    #[error("failed to read the chain head: {0}")]
    Head(#[source] ChainError),
    /// Fetching a window kept failing.
    #[error("failed to fetch logs of blocks {from}..={to}: {source}")]
    Window {
        /// First block of the window.
        from: u64,
        /// Last block of the window.
        to: u64,
        /// The last failure.
        #[source]
        source: ChainError,
    },
    /// An event kept failing after retries. The view is complete up to the log before it, so a
    /// new run may resume at `block`.
    #[error(
        "failed to apply log {log_index} of block {block}, resume from block {block}: {source}"
    )]
    Event {
        /// Block of the failing log.
        block: u64,
        /// Index of the failing log within its block.
        log_index: u64,
        /// The last failure.
        #[source]
        source: ReconcileError,
    },
}
