//! Default notice sinks.

use scribe_types::{Notice, NoticeLevel, NoticeSink};

/// Forwards notices to `tracing` at the matching level.
///
/// The sensible default for headless use; UI hosts supply their own sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn publish(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(text = %notice.text, "notice"),
            NoticeLevel::Warning => tracing::warn!(text = %notice.text, "notice"),
            NoticeLevel::Error => tracing::error!(text = %notice.text, "notice"),
        }
    }
}

/// Discards all notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NoticeSink for NullSink {
    fn publish(&self, _notice: Notice) {}
}
