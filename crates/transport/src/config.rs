use std::time::Duration;

/// Default interval between keep-alive pings.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default time to wait for a pong before the connection is considered dead.
pub const DEFAULT_PONG_TIMEOUT: Duration = Duration::from_secs(15);

/// Default delay between connection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Default age after which a healthy connection is replaced anyway.
pub const DEFAULT_MAX_CONNECTION_AGE: Duration = Duration::from_secs(60 * 60);

/// Timing of the keep-alive and reconnect logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// Interval between keep-alive pings.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub ping_interval: Duration,
    /// How long to wait for a pong.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub pong_timeout: Duration,
    /// Delay before reconnecting after a failure.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub reconnect_delay: Duration,
    /// Forces a reconnect once a connection is this old. `None` keeps connections indefinitely.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub max_connection_age: Option<Duration>,
    /// Capacity of the item channel handed to the consumer.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ping_interval: DEFAULT_PING_INTERVAL,
            pong_timeout: DEFAULT_PONG_TIMEOUT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            max_connection_age: Some(DEFAULT_MAX_CONNECTION_AGE),
            channel_capacity: 1024,
        }
    }
}
