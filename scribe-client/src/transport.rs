//! The seam between the chat store and the network.

use std::future::Future;

use scribe_types::{ChatError, ChatMessage, ChatSendRequest, ChatSession, EventStream};

/// Backend operations the store depends on.
///
/// The production implementation is [`ChatClient`](crate::ChatClient);
/// tests substitute scripted implementations. Everything except
/// [`send_chat`](Self::send_chat) is a plain request/response call.
pub trait ChatTransport: Send + Sync {
    /// Issue the streaming send and hand back the decoded event stream.
    ///
    /// A non-success HTTP status short-circuits before any stream
    /// processing with [`ChatError::ServerRejected`].
    fn send_chat(
        &self,
        request: ChatSendRequest,
    ) -> impl Future<Output = Result<EventStream, ChatError>> + Send;

    /// List the user's sessions.
    fn list_sessions(&self) -> impl Future<Output = Result<Vec<ChatSession>, ChatError>> + Send;

    /// Create a new session with the given title.
    fn create_session(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<ChatSession, ChatError>> + Send;

    /// Delete a session.
    fn delete_session(&self, session_id: i64)
    -> impl Future<Output = Result<(), ChatError>> + Send;

    /// Rename a session.
    fn rename_session(
        &self,
        session_id: i64,
        title: &str,
    ) -> impl Future<Output = Result<(), ChatError>> + Send;

    /// Fetch the persisted messages of a session.
    fn session_messages(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, ChatError>> + Send;
}
