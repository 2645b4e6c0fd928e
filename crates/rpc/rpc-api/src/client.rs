use crate::error::error_kind;
use jsonrpsee::core::client::Error as ClientError;
use ornode_primitives::ErrorKind;

/// Failure of a call made through the generated `ornode` clients, with node errors decoded.
#[derive(Debug, thiserror::Error)]
pub enum OrnodeClientError {
    /// The node rejected the call.
    #[error("{kind}: {message}")]
    Node {
        /// Failure kind reported by the node.
        kind: ErrorKind,
        /// Message reported by the node.
        message: String,
    },
    /// The server answered with an error object the node does not produce.
    #[error("unexpected error response {code}: {message}")]
    UnknownErrResponse {
        /// JSON-RPC error code.
        code: i32,
        /// Error message.
        message: String,
    },
    /// The request did not produce a response.
    #[error(transparent)]
    RequestFailed(ClientError),
}

impl OrnodeClientError {
    /// Returns the failure kind reported by the node, if the node answered.
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Node { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ClientError> for OrnodeClientError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Call(obj) => match error_kind(&obj) {
                Some(kind) => Self::Node { kind, message: obj.message().to_string() },
                None => Self::UnknownErrResponse {
                    code: obj.code(),
                    message: obj.message().to_string(),
                },
            },
            other => Self::RequestFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc_error;
    use assert_matches::assert_matches;
    use jsonrpsee_types::ErrorObject;

    #[test]
    fn decodes_node_errors() {
        let err = OrnodeClientError::from(ClientError::Call(rpc_error(
            ErrorKind::ProposalNotCreated,
            "proposal 0x01 was not created on-chain",
        )));
        assert_eq!(err.kind(), Some(ErrorKind::ProposalNotCreated));

        let err = OrnodeClientError::from(ClientError::Call(ErrorObject::owned(
            -32601,
            "Method not found",
            None::<()>,
        )));
        assert_matches!(err, OrnodeClientError::UnknownErrResponse { code: -32601, .. });

        let err = OrnodeClientError::from(ClientError::RequestTimeout);
        assert_matches!(err, OrnodeClientError::RequestFailed(_));
        assert_eq!(err.kind(), None);
    }
}
