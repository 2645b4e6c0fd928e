//! Client-facing side of the node.
//!
//! [`ProposalSyncService`] accepts proposal content from clients, checks it against its on-chain
//! commitment and serves paged reads of proposals, votes, awards and the period number.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serde support for [`PageLimits`].

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
mod error;
mod service;

pub use config::PageLimits;
pub use error::{InvalidProposal, SyncError, SyncResult};
pub use service::ProposalSyncService;
