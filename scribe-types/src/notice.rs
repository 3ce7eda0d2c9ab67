//! Transient user-facing notifications.
//!
//! The store raises these for conditions the user should see (stream
//! stopped, empty response, network failure) without coupling to any
//! particular UI. Hosts implement [`NoticeSink`]; the default sink in
//! `scribe-client` forwards to `tracing`.

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational (e.g. generation stopped by the user).
    Info,
    /// Something unexpected but not an error (e.g. empty response).
    Warning,
    /// A failure the user should know about.
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short human-readable text.
    pub text: String,
}

impl Notice {
    /// Build an info notice.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// Build a warning notice.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    /// Build an error notice.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Where the store publishes notices.
pub trait NoticeSink: Send + Sync {
    /// Publish one notice. Must not block.
    fn publish(&self, notice: Notice);
}
