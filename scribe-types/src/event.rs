//! Streaming event types for the incremental chat response.

use std::pin::Pin;

use futures::Stream;

use crate::error::ChatError;

/// An event decoded from the streaming response body.
///
/// Transient: produced by the wire decoder, consumed immediately by the
/// store, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The server-assigned session id, sent once at the head of a stream.
    SessionBound(i64),
    /// An incremental piece of assistant text, newline escapes resolved.
    ContentFragment(String),
    /// The `[DONE]` sentinel; no further events follow.
    Terminated,
}

/// Handle to a decoded event stream.
pub struct EventStream {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<StreamEvent, ChatError>> + Send>>,
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

impl EventStream {
    /// Wrap any compatible stream into a handle.
    pub fn new(
        stream: impl Stream<Item = Result<StreamEvent, ChatError>> + Send + 'static,
    ) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }
}
