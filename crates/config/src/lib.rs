//! Configuration of the ornode node.
//!
//! The node reads a single TOML file. Every section and every field is optional; missing values
//! fall back to their defaults, and a file with the defaults is written when none exists.

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod config;

pub use config::{
    ChainConfig, Config, ConfigError, StorageBackend, StorageConfig, SyncConfig, SyncMode,
};
