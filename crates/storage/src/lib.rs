//! Persistence of the node's materialized view.
//!
//! The view is split into four collections, each behind its own trait: proposals
//! ([`ProposalStore`]), votes ([`VoteStore`]), awards ([`AwardStore`]) and ticks ([`TickStore`]).
//! [`OrDb`] is implemented for anything providing all four.
//!
//! Every read-modify-write of a single record is atomic, so the reconciler and the request-facing
//! service may share one handle.
//!
//! Two backends are provided: [`MemoryOrDb`] keeps everything in memory and [`RedbOrDb`] persists
//! to a single `redb` file.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{StorageError, StorageResult};

mod award;
pub use award::*;

mod proposal;
pub use proposal::*;

mod tick;
pub use tick::*;

mod vote;
pub use vote::*;

mod memory;
pub use memory::MemoryOrDb;

mod persistent;
pub use persistent::RedbOrDb;

mod page;

/// Full access to the materialized view.
pub trait OrDb: ProposalStore + VoteStore + AwardStore + TickStore {}

impl<T> OrDb for T where T: ProposalStore + VoteStore + AwardStore + TickStore {}

#[cfg(test)]
mod tests;
