//! Configuration for the find controller.

use std::time::Duration;

/// Delay used to coalesce find requests typed in quick succession.
pub const FIND_TIMEOUT: Duration = Duration::from_millis(250);

/// Find controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    /// Debounce delay for requests without an explicit operation type.
    pub find_timeout: Duration,

    /// Publish the running match count as each page completes. When false,
    /// counts and result states are withheld until every page was scanned.
    pub update_matches_count_on_progress: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FindOptions {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            find_timeout: FIND_TIMEOUT,
            update_matches_count_on_progress: true,
        }
    }

    /// Set the debounce delay.
    pub fn with_find_timeout(mut self, timeout: Duration) -> Self {
        self.find_timeout = timeout;
        self
    }

    /// Enable or disable incremental match count updates.
    pub fn with_update_matches_count_on_progress(mut self, enable: bool) -> Self {
        self.update_matches_count_on_progress = enable;
        self
    }
}
