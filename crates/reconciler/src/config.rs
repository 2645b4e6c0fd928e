use std::time::Duration;

/// Default number of retries of a failing event before it is skipped.
pub const DEFAULT_EVENT_RETRIES: usize = 5;

/// Default delay before the first retry of a failing event. Later retries back off exponentially.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Default interval between stale stub sweeps.
pub const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Settings of the [`EventReconciler`](crate::EventReconciler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconcilerConfig {
    /// Retries of an event failing with a transient error.
    pub event_retries: usize,
    /// Delay before the first retry.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub retry_delay: Duration,
    /// Age after which proposals nobody submitted content for are soft-removed. `None` disables
    /// pruning.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub stub_retention: Option<Duration>,
    /// Interval between stale stub sweeps.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub prune_interval: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            event_retries: DEFAULT_EVENT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            stub_retention: None,
            prune_interval: DEFAULT_PRUNE_INTERVAL,
        }
    }
}
