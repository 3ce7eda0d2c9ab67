//! Internal helpers for mapping HTTP/reqwest errors to [`ChatError`].

use scribe_types::ChatError;

/// Map a non-success HTTP status and best-effort body text to a [`ChatError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    ChatError::ServerRejected {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Map a [`reqwest::Error`] raised while sending a request.
///
/// Anything that prevented a response from being obtained at all is
/// `Unreachable`; errors after a response existed (body reads) are
/// `Generic`.
pub(crate) fn map_send_error(err: reqwest::Error) -> ChatError {
    ChatError::Unreachable(Box::new(err))
}

/// Map a [`reqwest::Error`] raised while reading a response body.
pub(crate) fn map_body_error(err: reqwest::Error) -> ChatError {
    ChatError::Generic(format!("response read error: {err}"))
}
