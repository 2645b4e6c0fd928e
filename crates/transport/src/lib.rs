//! A log subscription that survives the connection it runs over.
//!
//! [`ResilientSubscription::spawn`] starts a supervisor task that connects through a
//! [`Connector`] and forwards every item the connection yields. Silent connections are detected
//! with ping/pong and replaced. Consumers only ever see items, while transport failures are logged
//! and healed. The returned [`SubscriptionHandle`] stops everything.
//!
//! [`WsLogsConnector`] is the production connector: a websocket `eth_subscribe("logs")` feed.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serde support for [`TransportConfig`].

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
mod connection;
mod error;
mod subscription;
mod ws;

pub use config::TransportConfig;
pub use connection::{Connection, Connector, Frame};
pub use error::TransportError;
pub use subscription::{ResilientSubscription, Subscription, SubscriptionHandle};
pub use ws::{WsLogsConnection, WsLogsConnector};

#[cfg(test)]
mod test_utils;
