use std::time::Duration;

/// Default number of blocks fetched per request.
pub const DEFAULT_STEP_RANGE: u64 = 2_000;

/// Default number of retries of a failing window.
pub const DEFAULT_MAX_RETRIES: usize = 5;

/// Default delay before the first retry of a window.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Settings of the [`BackfillController`](crate::BackfillController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackfillConfig {
    /// Number of blocks per log request.
    pub step_range: u64,
    /// Retries of a failing window before the run fails.
    pub max_retries: usize,
    /// Delay before the first retry. Later retries back off exponentially.
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub retry_delay: Duration,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            step_range: DEFAULT_STEP_RANGE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}
