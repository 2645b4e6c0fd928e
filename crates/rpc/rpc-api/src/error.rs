//! Error codes of the `ornode` namespace.
//!
//! Every error the node returns carries `data: {"kind": "<ErrorKind>"}` next to a code dedicated
//! to that kind, so clients can tell failures apart without parsing messages.

use jsonrpsee_types::{error::INTERNAL_ERROR_CODE, ErrorObject, ErrorObjectOwned};
use ornode_primitives::ErrorKind;
use serde::{Deserialize, Serialize};

/// Code of [`ErrorKind::ProposalNotFound`].
pub const PROPOSAL_NOT_FOUND_CODE: i32 = -32001;
/// Code of [`ErrorKind::ProposalNotCreated`].
pub const PROPOSAL_NOT_CREATED_CODE: i32 = -32002;
/// Code of [`ErrorKind::ProposalInvalid`].
pub const PROPOSAL_INVALID_CODE: i32 = -32003;
/// Code of [`ErrorKind::TokenNotFound`].
pub const TOKEN_NOT_FOUND_CODE: i32 = -32004;

/// The `data` member of node errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Failure kind.
    pub kind: ErrorKind,
}

/// Returns the JSON-RPC code of a failure kind.
pub const fn error_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::ProposalNotFound => PROPOSAL_NOT_FOUND_CODE,
        ErrorKind::ProposalNotCreated => PROPOSAL_NOT_CREATED_CODE,
        ErrorKind::ProposalInvalid => PROPOSAL_INVALID_CODE,
        ErrorKind::TokenNotFound => TOKEN_NOT_FOUND_CODE,
        ErrorKind::Internal => INTERNAL_ERROR_CODE,
    }
}

/// Builds the error object reported for a failure.
pub fn rpc_error(kind: ErrorKind, message: impl Into<String>) -> ErrorObjectOwned {
    ErrorObject::owned(error_code(kind), message.into(), Some(ErrorData { kind }))
}

/// Returns the failure kind of an error object produced by [`rpc_error`], or `None` if the object
/// has a different shape.
pub fn error_kind(err: &ErrorObject<'_>) -> Option<ErrorKind> {
    let data: ErrorData = serde_json::from_str(err.data()?.get()).ok()?;
    (error_code(data.kind) == err.code()).then_some(data.kind)
}
