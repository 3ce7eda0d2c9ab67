//! Configuration for the chat store.

use std::time::Duration;

/// Default timeout for one streaming request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Static configuration for a [`ChatStore`](crate::ChatStore) instance.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a streaming request may run before it is cancelled.
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
