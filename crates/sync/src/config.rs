/// Default page size when a query does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default upper bound on the page size.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Page sizes served by the [`ProposalSyncService`](crate::ProposalSyncService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageLimits {
    /// Page size used when the query has no limit.
    pub default_size: usize,
    /// Requested limits are clamped to this.
    pub max_size: usize,
}

impl PageLimits {
    /// Returns the page size to serve for a requested limit.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_size).min(self.max_size)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_size: DEFAULT_PAGE_SIZE, max_size: DEFAULT_MAX_PAGE_SIZE }
    }
}
