//! Reqwest-backed implementation of [`ChatTransport`].

use std::future::Future;

use serde::de::DeserializeOwned;

use scribe_types::{
    ApiEnvelope, ChatError, ChatMessage, ChatSendRequest, ChatSession, EventStream,
};
use scribe_wire::event_stream;

use crate::error::{map_body_error, map_http_status, map_send_error};
use crate::transport::ChatTransport;

/// HTTP client for the scribe chat backend.
///
/// # Example
///
/// ```no_run
/// use scribe_client::ChatClient;
///
/// let client = ChatClient::new("http://localhost:8080/api")
///     .bearer_token("eyJhbGciOi...");
/// ```
pub struct ChatClient {
    /// API base URL, without a trailing slash.
    pub(crate) base_url: String,
    /// Bearer token attached to every request, if set.
    pub(crate) token: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ChatClient {
    /// Create a client for the given API base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach a bearer token for the `Authorization` header.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build a full endpoint URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the backend's uniform envelope.
    ///
    /// A non-success HTTP status or an envelope `code != 200` is an error;
    /// the payload may legitimately be absent (`data: null`).
    async fn request_envelope<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Option<T>, ChatError> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_body_error)?;
        if !status.is_success() {
            return Err(map_http_status(status, &body));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| ChatError::Generic(format!("invalid envelope: {e}")))?;
        if envelope.code != 200 {
            return Err(ChatError::Generic(format!(
                "api error {}: {}",
                envelope.code,
                envelope.message.unwrap_or_default()
            )));
        }
        Ok(envelope.data)
    }
}

impl ChatTransport for ChatClient {
    /// `POST /chat/send`, response consumed as a live event stream.
    fn send_chat(
        &self,
        request: ChatSendRequest,
    ) -> impl Future<Output = Result<EventStream, ChatError>> + Send {
        async move {
            let url = self.url("/chat/send");
            tracing::debug!(url = %url, session_id = ?request.session_id, "sending chat request");

            let response = self
                .authorize(self.client.post(&url))
                .json(&request)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(map_http_status(status, &body));
            }

            Ok(EventStream::new(event_stream(response.bytes_stream())))
        }
    }

    /// `GET /chat/sessions`.
    fn list_sessions(&self) -> impl Future<Output = Result<Vec<ChatSession>, ChatError>> + Send {
        async move {
            let data = self
                .request_envelope(self.client.get(self.url("/chat/sessions")))
                .await?;
            Ok(data.unwrap_or_default())
        }
    }

    /// `POST /chat/session?title=...`.
    fn create_session(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<ChatSession, ChatError>> + Send {
        let title = title.to_string();
        async move {
            let builder = self
                .client
                .post(self.url("/chat/session"))
                .query(&[("title", title.as_str())]);
            self.request_envelope(builder)
                .await?
                .ok_or_else(|| ChatError::Generic("create session returned no data".into()))
        }
    }

    /// `DELETE /chat/session/{id}`.
    fn delete_session(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<(), ChatError>> + Send {
        async move {
            let url = self.url(&format!("/chat/session/{session_id}"));
            self.request_envelope::<serde_json::Value>(self.client.delete(url))
                .await?;
            Ok(())
        }
    }

    /// `PUT /chat/session/{id}?title=...`.
    fn rename_session(
        &self,
        session_id: i64,
        title: &str,
    ) -> impl Future<Output = Result<(), ChatError>> + Send {
        let title = title.to_string();
        async move {
            let url = self.url(&format!("/chat/session/{session_id}"));
            let builder = self.client.put(url).query(&[("title", title.as_str())]);
            self.request_envelope::<serde_json::Value>(builder).await?;
            Ok(())
        }
    }

    /// `GET /chat/session/{id}/messages`.
    fn session_messages(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, ChatError>> + Send {
        async move {
            let url = self.url(&format!("/chat/session/{session_id}/messages"));
            let data = self.request_envelope(self.client.get(url)).await?;
            Ok(data.unwrap_or_default())
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use scribe_types::StreamEvent;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn trailing_slashes_are_stripped_from_base_url() {
        let client = ChatClient::new("http://localhost:8080/api/");
        assert_eq!(client.url("/chat/send"), "http://localhost:8080/api/chat/send");
    }

    #[test]
    fn token_is_stored() {
        let client = ChatClient::new("http://localhost").bearer_token("t0k3n");
        assert_eq!(client.token.as_deref(), Some("t0k3n"));
    }

    #[tokio::test]
    async fn send_chat_decodes_stream_and_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/send"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"sessionId\":7}\ndata: Hi\ndata: [DONE]\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri()).bearer_token("test-token");
        let stream = client
            .send_chat(ChatSendRequest {
                session_id: None,
                content: "hello".into(),
            })
            .await
            .unwrap();

        let events: Vec<StreamEvent> = stream
            .receiver
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::SessionBound(7),
                StreamEvent::ContentFragment("Hi".into()),
                StreamEvent::Terminated,
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/send"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let err = client
            .send_chat(ChatSendRequest {
                session_id: Some(1),
                content: "hello".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChatError::ServerRejected { status: 500, ref body } if body == "backend down"
        ));
    }

    #[tokio::test]
    async fn list_sessions_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":200,"message":null,"data":[{"id":1,"title":"Notes"}]}"#,
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let sessions = client.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, 1);
        assert_eq!(sessions[0].title, "Notes");
    }

    #[tokio::test]
    async fn envelope_code_failure_maps_to_generic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/sessions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"code":403,"message":"forbidden"}"#),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let err = client.list_sessions().await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Generic(ref msg) if msg.contains("403") && msg.contains("forbidden")
        ));
    }

    #[tokio::test]
    async fn create_session_passes_title_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/session"))
            .and(query_param("title", "New chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":200,"data":{"id":9,"title":"New chat"}}"#,
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let session = client.create_session("New chat").await.unwrap();
        assert_eq!(session.id, 9);
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_unreachable() {
        // Port 1 is never listening.
        let client = ChatClient::new("http://127.0.0.1:1");
        let err = client.list_sessions().await.unwrap_err();
        assert!(matches!(err, ChatError::Unreachable(_)));
    }
}
