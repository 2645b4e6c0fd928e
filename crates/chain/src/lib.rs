//! Access to the Orec and Respect1155 contracts.
//!
//! This crate contains:
//!  - the contract bindings ([`abi`])
//!  - typed decoding of raw Orec logs ([`ChainLog`])
//!  - decoding of proposal calldata into the action it performs ([`decode_proposal`])
//!  - the [`ChainReader`] and [`LogSource`] traits the rest of the node consumes the chain through,
//!    with an implementation over an alloy provider ([`RpcChain`])
//!
//! ## Feature Flags
//!
//! - `test-utils`: Export an in-memory chain mock and log builders for testing.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod abi;
mod decode;
mod error;
mod event;
mod reader;

pub use decode::{decode_proposal, Contracts, DecodedProposal, Mint, MintContext};
pub use error::{ChainError, DecodeError};
pub use event::{ChainEvent, ChainLog, EventMeta, TICK_SIGNAL};
pub use reader::{ChainReader, HttpChain, LogSource, RpcChain};

/// Raw log as returned by `eth_getLogs` and `eth_subscribe`.
pub use alloy_rpc_types_eth::Log;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers for mocking the chain.
pub mod test_utils;
