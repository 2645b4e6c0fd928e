//! Implementation of the ornode RPC namespaces.
//!
//! [`OrnodeRpc`] answers `ornode` and `ornodeAdmin` requests from a shared
//! [`ProposalSyncService`](ornode_sync::ProposalSyncService). [`launch`] binds a server serving
//! the namespaces enabled in an [`RpcConfig`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enables deserializing [`RpcConfig`] from configuration files.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
mod error;
mod ornode;
mod server;

pub use config::{RpcConfig, DEFAULT_MAX_CONNECTIONS, DEFAULT_RPC_PORT};
pub use error::RpcServerError;
pub use ornode::OrnodeRpc;
pub use server::{launch, ornode_module, RpcServerHandle};

#[cfg(test)]
mod tests;
