//! The chat session store: single-flight streaming state machine.
//!
//! Owns the message list and session id, drives the read loop over the
//! decoded event stream, and maps terminal conditions (success, stop,
//! timeout, network failure, server rejection) onto user-visible state.
//! All mutation happens through one lock held only between awaits, so a
//! host can call [`ChatStore::stop_generation`] from another task while a
//! send is in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::StreamExt;

use scribe_types::{
    ChatError, ChatMessage, ChatSendRequest, ChatSession, Notice, NoticeSink, Role, StreamEvent,
    StreamState,
};

use crate::config::StoreConfig;
use crate::lifecycle::{CancelReason, StreamLifecycle};
use crate::transport::ChatTransport;

/// Placeholder text when generation is stopped before any content arrived.
pub const STOPPED_FALLBACK: &str = "Generation stopped.";

/// Placeholder text when the request was cancelled or timed out with an
/// empty placeholder.
pub const CANCELLED_FALLBACK: &str = "The request timed out or was cancelled.\n\n\
     Check that the assistant service is running and reachable.";

/// Placeholder text when the backend could not be reached at all.
pub const UNREACHABLE_FALLBACK: &str = "Network connection failed.\n\n\
     Check that the backend service is running.";

/// Placeholder text when a stream completed without producing any content.
pub const NO_CONTENT_FALLBACK: &str = "The assistant returned no content.\n\n\
     Check the service logs for details.";

/// Chat session store.
///
/// Generic over the transport (production: [`ChatClient`]) and the notice
/// sink the host UI provides. At most one streaming request is in flight
/// per store; concurrent sends are rejected, not queued.
///
/// [`ChatClient`]: crate::ChatClient
pub struct ChatStore<T: ChatTransport, N: NoticeSink> {
    transport: T,
    notices: N,
    config: StoreConfig,
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    session_id: Option<i64>,
    messages: Vec<ChatMessage>,
    sessions: Vec<ChatSession>,
    state: StreamState,
    lifecycle: Option<Arc<StreamLifecycle>>,
}

impl<T: ChatTransport, N: NoticeSink> ChatStore<T, N> {
    /// Create a store with the default configuration.
    #[must_use]
    pub fn new(transport: T, notices: N) -> Self {
        Self::with_config(transport, notices, StoreConfig::default())
    }

    /// Create a store with an explicit configuration.
    #[must_use]
    pub fn with_config(transport: T, notices: N, config: StoreConfig) -> Self {
        Self {
            transport,
            notices,
            config,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// The bound session id, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<i64> {
        self.lock().session_id
    }

    /// Snapshot of the conversation, incrementally updated while streaming.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    /// Snapshot of the cached session list.
    #[must_use]
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.lock().sessions.clone()
    }

    /// Whether a streaming request is currently in flight.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.lock().state == StreamState::Streaming
    }

    /// Send a user message and stream the assistant's reply.
    ///
    /// A blank `content` or an already-streaming store makes this a no-op.
    /// Appends the user message and an empty assistant placeholder, then
    /// drives the read loop until the terminator, end of transport, an
    /// error, cancellation, or the configured timeout. Failures never
    /// propagate: each classification writes its fallback text into the
    /// placeholder, and all but cancellation raise an error notice.
    pub async fn send_message(&self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }

        let (lifecycle, session_id) = {
            let mut inner = self.lock();
            if inner.state == StreamState::Streaming {
                return;
            }
            inner.state = StreamState::Streaming;
            inner.messages.push(ChatMessage::user(content));
            inner.messages.push(ChatMessage::assistant(""));

            let lifecycle = StreamLifecycle::start(self.config.request_timeout);
            inner.lifecycle = Some(lifecycle.clone());
            (lifecycle, inner.session_id)
        };

        let request = ChatSendRequest {
            session_id,
            content: content.to_string(),
        };
        let result = self.run_stream(&lifecycle, request).await;
        lifecycle.settled();

        {
            let mut inner = self.lock();
            inner.state = StreamState::Idle;
            inner.lifecycle = None;
        }

        match result {
            Ok(()) => {
                if self.placeholder_is_empty() {
                    self.fill_placeholder_if_empty(NO_CONTENT_FALLBACK);
                    self.notices
                        .publish(Notice::warning("The assistant returned no content"));
                }
                // Best-effort: a failed refresh is logged, never escalated.
                if let Err(e) = self.refresh_sessions().await {
                    tracing::warn!(error = %e, "session list refresh failed");
                }
            }
            Err(err) => self.apply_failure(err),
        }
    }

    /// Stop the in-flight generation, if any.
    ///
    /// Cancels the active lifecycle, forces the state back to `Idle`, and
    /// writes the stopped marker into a still-empty placeholder. When no
    /// stream is active this is a silent no-op, so calling it twice is
    /// observably identical to calling it once.
    pub fn stop_generation(&self) {
        let lifecycle = {
            let mut inner = self.lock();
            let was_streaming = inner.state == StreamState::Streaming;
            inner.state = StreamState::Idle;
            let lifecycle = inner.lifecycle.take();
            if lifecycle.is_none() && !was_streaming {
                return;
            }
            lifecycle
        };

        if let Some(lifecycle) = lifecycle {
            lifecycle.cancel(CancelReason::UserStop);
        }
        self.fill_placeholder_if_empty(STOPPED_FALLBACK);
        self.notices.publish(Notice::info("Generation stopped"));
    }

    /// Re-fetch the session list from the server.
    pub async fn refresh_sessions(&self) -> Result<(), ChatError> {
        let sessions = self.transport.list_sessions().await?;
        self.lock().sessions = sessions;
        Ok(())
    }

    /// Create a new session, bind it, and clear the local conversation.
    pub async fn create_session(&self, title: &str) -> Result<ChatSession, ChatError> {
        let session = self.transport.create_session(title).await?;
        {
            let mut inner = self.lock();
            inner.session_id = Some(session.id);
            inner.messages.clear();
        }
        if let Err(e) = self.refresh_sessions().await {
            tracing::warn!(error = %e, "session list refresh failed");
        }
        Ok(session)
    }

    /// Delete a session, clearing local state if it was the current one.
    pub async fn delete_session(&self, session_id: i64) -> Result<(), ChatError> {
        self.transport.delete_session(session_id).await?;
        if self.lock().session_id == Some(session_id) {
            self.clear_session();
        }
        if let Err(e) = self.refresh_sessions().await {
            tracing::warn!(error = %e, "session list refresh failed");
        }
        Ok(())
    }

    /// Rename a session and refresh the list.
    pub async fn rename_session(&self, session_id: i64, title: &str) -> Result<(), ChatError> {
        self.transport.rename_session(session_id, title).await?;
        self.refresh_sessions().await
    }

    /// Load a session's persisted messages and bind its id.
    pub async fn load_session(&self, session_id: i64) -> Result<(), ChatError> {
        let messages = self.transport.session_messages(session_id).await?;
        let mut inner = self.lock();
        inner.messages = messages;
        inner.session_id = Some(session_id);
        Ok(())
    }

    /// Drop the local conversation and session binding (local only).
    ///
    /// Cancels any in-flight stream first.
    pub fn clear_session(&self) {
        let lifecycle = {
            let mut inner = self.lock();
            inner.messages.clear();
            inner.session_id = None;
            inner.state = StreamState::Idle;
            inner.lifecycle.take()
        };
        if let Some(lifecycle) = lifecycle {
            lifecycle.cancel(CancelReason::UserStop);
        }
    }

    /// Drive the transport call and the read loop for one request.
    ///
    /// Every await races the cancellation token; once it fires, no further
    /// reads are attempted and the result is terminal regardless of what
    /// the transport would still deliver.
    async fn run_stream(
        &self,
        lifecycle: &StreamLifecycle,
        request: ChatSendRequest,
    ) -> Result<(), ChatError> {
        let token = lifecycle.token();
        tracing::debug!(session_id = ?request.session_id, "starting chat stream");

        let stream = tokio::select! {
            () = token.cancelled() => return Err(ChatError::Cancelled),
            result = self.transport.send_chat(request) => result?,
        };

        let mut events = stream.receiver;
        loop {
            let next = tokio::select! {
                () = token.cancelled() => return Err(ChatError::Cancelled),
                event = events.next() => event,
            };
            match next {
                None => break,
                Some(Ok(StreamEvent::SessionBound(id))) => {
                    self.lock().session_id = Some(id);
                }
                Some(Ok(StreamEvent::ContentFragment(text))) => {
                    self.with_placeholder(|msg| msg.content.push_str(&text));
                }
                Some(Ok(StreamEvent::Terminated)) => break,
                Some(Err(err)) => return Err(err),
            }
        }
        Ok(())
    }

    /// Map a terminal failure onto placeholder text and notices.
    ///
    /// Cancellation stays silent: the user either asked for it or already
    /// saw the stop marker, and a timeout fills the placeholder only when
    /// nothing was generated before it fired.
    fn apply_failure(&self, err: ChatError) {
        tracing::warn!(error = %err, "chat send failed");
        match err {
            ChatError::Cancelled => {
                self.fill_placeholder_if_empty(CANCELLED_FALLBACK);
            }
            ChatError::Unreachable(_) => {
                self.set_placeholder(UNREACHABLE_FALLBACK.to_string());
                self.notices
                    .publish(Notice::error("Network connection failed"));
            }
            err @ (ChatError::ServerRejected { .. } | ChatError::Generic(_)) => {
                self.set_placeholder(format!("Request failed: {err}"));
                self.notices.publish(Notice::error("Message send failed"));
            }
        }
    }

    /// Run `f` on the assistant placeholder (the trailing assistant
    /// message), if present.
    fn with_placeholder(&self, f: impl FnOnce(&mut ChatMessage)) {
        let mut inner = self.lock();
        if let Some(last) = inner.messages.last_mut() {
            if last.role == Role::Assistant {
                f(last);
            }
        }
    }

    fn set_placeholder(&self, text: String) {
        self.with_placeholder(|msg| msg.content = text);
    }

    fn fill_placeholder_if_empty(&self, text: &str) {
        self.with_placeholder(|msg| {
            if msg.content.is_empty() {
                msg.content = text.to_string();
            }
        });
    }

    fn placeholder_is_empty(&self) -> bool {
        let inner = self.lock();
        matches!(
            inner.messages.last(),
            Some(msg) if msg.role == Role::Assistant && msg.content.is_empty()
        )
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store lock poisoned")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
