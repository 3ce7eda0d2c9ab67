//! Core message, session, and request types.
//!
//! Field names are renamed to camelCase on the wire to match the backend's
//! JSON (e.g. `sessionId`, `createTime`).

use serde::{Deserialize, Serialize};

/// The role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human user.
    User,
    /// The AI assistant.
    Assistant,
}

/// A message in a conversation.
///
/// Owned exclusively by the store's message list. The assistant placeholder
/// starts empty and is appended to as content fragments arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Server-assigned message id, if persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The session this message belongs to, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    /// The role of the message author.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// Server-side creation timestamp, if persisted.
    #[serde(default, rename = "createTime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ChatMessage {
    /// Create a user message.
    ///
    /// # Example
    ///
    /// ```
    /// use scribe_types::ChatMessage;
    /// let msg = ChatMessage::user("What is a monad?");
    /// ```
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: None,
            session_id: None,
            role: Role::User,
            content: content.into(),
            created_at: None,
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: None,
            session_id: None,
            role: Role::Assistant,
            content: content.into(),
            created_at: None,
        }
    }
}

/// A chat session as listed by the server.
///
/// Identity is server-assigned; the client learns it either at session
/// creation or from the first session-binding frame of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Server-assigned session id.
    pub id: i64,
    /// Owning user, if the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Display title.
    pub title: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// Last-activity timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// Body of the streaming send request (`POST /chat/send`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendRequest {
    /// Existing session to continue, or `None` to let the server create one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    /// The user's message text.
    pub content: String,
}

/// The backend's uniform REST envelope. `code == 200` is success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Application-level status code.
    pub code: i32,
    /// Optional human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
    /// The payload, present on success.
    #[serde(default)]
    pub data: Option<T>,
}

/// Whether a store currently has a streaming request in flight.
///
/// At most one `Streaming` per store instance; entering `Streaming`
/// requires the prior state to be `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// No request in flight.
    #[default]
    Idle,
    /// A streaming request is being read.
    Streaming,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_role() {
        assert_eq!(ChatMessage::user("hi").role, Role::User);
        assert_eq!(ChatMessage::assistant("").role, Role::Assistant);
    }

    #[test]
    fn send_request_omits_absent_session_id() {
        let body = serde_json::to_string(&ChatSendRequest {
            session_id: None,
            content: "hello".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"content":"hello"}"#);
    }

    #[test]
    fn send_request_uses_camel_case_session_id() {
        let body = serde_json::to_string(&ChatSendRequest {
            session_id: Some(42),
            content: "hello".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"sessionId":42,"content":"hello"}"#);
    }

    #[test]
    fn message_round_trips_backend_json() {
        let json = r#"{"id":7,"sessionId":42,"role":"assistant","content":"hi","createTime":"2026-01-01T00:00:00"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, Some(7));
        assert_eq!(msg.session_id, Some(42));
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.created_at.as_deref(), Some("2026-01-01T00:00:00"));
    }

    #[test]
    fn envelope_decodes_missing_data() {
        let env: ApiEnvelope<Vec<ChatSession>> =
            serde_json::from_str(r#"{"code":500,"message":"boom"}"#).unwrap();
        assert_eq!(env.code, 500);
        assert!(env.data.is_none());
    }
}
