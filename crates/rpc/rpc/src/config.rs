use ornode_sync::PageLimits;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Default port of the RPC server.
pub const DEFAULT_RPC_PORT: u16 = 8090;

/// Default maximum number of concurrent connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;

/// Settings of the RPC server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RpcConfig {
    /// Address the server listens on.
    pub addr: SocketAddr,
    /// Maximum number of concurrent connections.
    pub max_connections: u32,
    /// Whether the `ornodeAdmin` namespace is served.
    pub enable_admin: bool,
    /// Page sizes of list queries.
    pub pages: PageLimits,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_RPC_PORT)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            enable_admin: false,
            pages: PageLimits::default(),
        }
    }
}
