use jsonrpsee::core::RegisterMethodError;
use jsonrpsee_types::ErrorObjectOwned;
use ornode_primitives::ErrorKind;
use ornode_rpc_api::error::rpc_error;
use ornode_sync::SyncError;
use tracing::{debug, error};

/// Errors starting the RPC server.
#[derive(Debug, thiserror::Error)]
pub enum RpcServerError {
    /// Binding the listen address failed.
    #[error("failed to bind rpc server: {0}")]
    Bind(#[source] std::io::Error),
    /// Two namespaces registered the same method.
    #[error(transparent)]
    Register(#[from] RegisterMethodError),
}

/// Converts a service failure into the error object sent to the client.
///
/// Internal failures are logged and reported without their details.
pub(crate) fn into_rpc_error(method: &'static str, err: SyncError) -> ErrorObjectOwned {
    match err.kind() {
        ErrorKind::Internal => {
            error!(target: "ornode::rpc", method, %err, "Request failed");
            rpc_error(ErrorKind::Internal, "internal error")
        }
        kind => {
            debug!(target: "ornode::rpc", method, %err, "Request rejected");
            rpc_error(kind, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use ornode_rpc_api::error::{error_kind, PROPOSAL_NOT_FOUND_CODE};

    #[test]
    fn hides_internal_details() {
        let id = B256::with_last_byte(1);
        let err = into_rpc_error("test", SyncError::ProposalNotFound(id));
        assert_eq!(err.code(), PROPOSAL_NOT_FOUND_CODE);
        assert!(err.message().contains(&id.to_string()));

        let inconsistent = SyncError::Inconsistent { id, reason: "stored content differs" };
        let err = into_rpc_error("test", inconsistent);
        assert_eq!(error_kind(&err), Some(ErrorKind::Internal));
        assert_eq!(err.message(), "internal error");
    }
}
