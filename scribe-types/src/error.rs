//! Error types for all scribe crates.

/// Errors from the chat send flow and session operations.
///
/// Classification drives the store's fallback messages: `Cancelled` is
/// silent (user stop and timeout converge on the same token), the other
/// variants surface a user-visible notice.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The request's cancellation token fired (user stop or timeout).
    #[error("cancelled")]
    Cancelled,
    /// Transport-level failure: no response was obtained at all.
    #[error("network unreachable: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The server answered with a non-success HTTP status.
    #[error("server rejected request (HTTP {status}): {body}")]
    ServerRejected {
        /// The HTTP status code.
        status: u16,
        /// Best-effort response body text.
        body: String,
    },
    /// Any other failure (malformed stream read, bad envelope, ...).
    #[error("{0}")]
    Generic(String),
}

impl ChatError {
    /// Whether this error came from the shared cancellation token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
