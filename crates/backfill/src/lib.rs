//! Historical replay of Orec logs.
//!
//! [`BackfillController`] walks a block range in fixed-size windows, fetches each window's logs
//! from a [`LogSource`](ornode_chain::LogSource), orders them by position and feeds them through
//! the same [`EventReconciler`](ornode_reconciler::EventReconciler) the live subscription uses.
//! Only malformed logs are skipped. A window or an event that keeps failing aborts the run with
//! its position.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serde support for [`BackfillConfig`].

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
mod controller;
mod error;

pub use config::BackfillConfig;
pub use controller::{BackfillController, BackfillSummary};
pub use error::BackfillError;
