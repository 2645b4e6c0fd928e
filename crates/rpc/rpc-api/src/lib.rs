//! ornode RPC interface definitions
//!
//! The `ornode` namespace serves proposal submission and the materialized view. The
//! `ornodeAdmin` namespace carries operator-only calls and is served only when enabled.
//!
//! ## Feature Flags
//!
//! - `client`: Enables JSON-RPC client support.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod error;
mod ornode;

#[cfg(feature = "client")]
mod client;
#[cfg(feature = "client")]
pub use client::OrnodeClientError;

/// re-export of all server traits
pub use servers::*;

/// Aggregates all server traits.
pub mod servers {
    pub use crate::ornode::{OrnodeAdminApiServer, OrnodeApiServer};
}

/// re-export of all client traits
#[cfg(feature = "client")]
pub use clients::*;

/// Aggregates all client traits.
#[cfg(feature = "client")]
pub mod clients {
    pub use crate::ornode::{OrnodeAdminApiClient, OrnodeApiClient};
}
