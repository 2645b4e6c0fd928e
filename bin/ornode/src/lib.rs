//! ornode command line interface.
//!
//! `ornode node` follows the Orec contract and serves the view over JSON-RPC, `ornode backfill`
//! replays a block range into the configured store and exits, and `ornode config` prints the
//! configuration.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod args;
pub mod cli;
pub mod commands;
