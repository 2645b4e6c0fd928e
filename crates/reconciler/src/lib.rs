//! Applies Orec events to the materialized view.
//!
//! The [`EventReconciler`] is the only writer of chain-derived state. It is fed by the live
//! subscription ([`EventReconciler::run`]) or by a backfill, and applies every event idempotently:
//!  - `ProposalCreated` inserts a stub carrying the creation time and transaction
//!  - `WeightedVoteIndexed` records a vote keyed by the event
//!  - `Executed` and `ExecutionFailed` record the outcome and materialize minted or burned awards
//!  - a tick `Signal` advances the period
//!
//! Malformed events are logged and skipped. Transient chain or storage failures are retried with
//! exponential backoff before the event is skipped.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serde support for [`ReconcilerConfig`].

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
mod effects;
mod error;
mod reconciler;

pub use config::ReconcilerConfig;
pub use effects::{apply_effects, Effects};
pub use error::ReconcileError;
pub use reconciler::{EventReconciler, Reconciled};
