use alloy_primitives::{Address, B256};
use ornode_primitives::{TokenIdError, UnknownCode};

/// Errors talking to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The RPC transport failed.
    #[error(transparent)]
    Transport(#[from] alloy_transport::TransportError),
    /// A contract call failed.
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),
    /// The node does not know the requested block.
    #[error("block {0} not found")]
    BlockNotFound(u64),
    /// The contract returned a value outside its documented range.
    #[error(transparent)]
    UnknownCode(#[from] UnknownCode),
}

impl ChainError {
    /// Returns true if repeating the request may succeed.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnknownCode(_))
    }
}

/// Errors decoding logs or proposal calldata.
///
/// These describe malformed input; retrying never helps.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The log was removed by a reorg.
    #[error("log was removed by a reorg")]
    Removed,
    /// The log was emitted by a contract other than Orec.
    #[error("log emitted by {0}, not by the Orec contract")]
    ForeignContract(Address),
    /// The log has no topic or an unknown event signature.
    #[error("unknown event signature {0:?}")]
    UnknownEvent(Option<B256>),
    /// The log lacks metadata only mined logs carry.
    #[error("log is missing its {0}")]
    MissingMeta(&'static str),
    /// ABI decoding failed.
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
    /// An enum field has an unknown code.
    #[error(transparent)]
    UnknownCode(#[from] UnknownCode),
    /// A minted token id is malformed.
    #[error(transparent)]
    TokenId(#[from] TokenIdError),
    /// The attachment describes a different action than the content performs.
    #[error("attachment of type {attachment} does not match a {content} proposal")]
    AttachmentMismatch {
        /// `propType` of the attachment.
        attachment: &'static str,
        /// Kind of action the content decodes to.
        content: &'static str,
    },
    /// A breakout group mints to more members than there are levels.
    #[error("breakout group mints to {0} members, at most {max} allowed", max = crate::decode::MAX_BREAKOUT_MEMBERS)]
    TooManyBreakoutMembers(usize),
}
