//! Line classification for the chat stream protocol.

use serde::Deserialize;

use scribe_types::StreamEvent;

/// Lines must begin with this prefix to be meaningful.
const DATA_PREFIX: &str = "data:";

/// Sentinel payload marking the end of the stream.
const TERMINATOR: &str = "[DONE]";

/// Structural prefix of a session-binding frame.
///
/// This is a duck-typed sniff, not a framed protocol: genuine content that
/// happens to start with this text on the very first payload of a stream
/// is misclassified as a session frame. Preserved as-is.
const SESSION_FRAME_PREFIX: &str = "{\"sessionId\":";

/// Shape of the session-binding frame payload.
#[derive(Deserialize)]
struct SessionFrame {
    #[serde(rename = "sessionId")]
    session_id: i64,
}

/// Classifies each complete protocol line into a [`StreamEvent`].
///
/// Stateful only for the session-probe window: the session-binding sniff
/// applies to the first qualifying (non-empty, non-terminator) payload of
/// a stream and never again after it, whatever it turned out to be.
#[derive(Debug)]
pub struct EventDecoder {
    probe_pending: bool,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDecoder {
    /// Create a decoder with the session-probe window open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            probe_pending: true,
        }
    }

    /// Decode one complete line.
    ///
    /// Returns `None` for ignorable lines (no `data:` prefix, or an empty
    /// payload). After [`StreamEvent::Terminated`] the caller must stop
    /// processing further lines, including ones already split out of the
    /// same chunk.
    pub fn decode(&mut self, line: &str) -> Option<StreamEvent> {
        let payload = Self::payload(line)?;

        if payload == TERMINATOR {
            return Some(StreamEvent::Terminated);
        }

        if self.probe_pending {
            // The probe window closes on the first qualifying payload no
            // matter how it decodes.
            self.probe_pending = false;
            if payload.starts_with(SESSION_FRAME_PREFIX) {
                if let Ok(frame) = serde_json::from_str::<SessionFrame>(payload) {
                    return Some(StreamEvent::SessionBound(frame.session_id));
                }
                // Parse failure: recover locally, treat as ordinary content.
            }
        }

        Some(StreamEvent::ContentFragment(unescape_newlines(payload)))
    }

    /// Decode the final unterminated line flushed at end of stream.
    ///
    /// Best-effort: only content is recovered here. A `[DONE]` tail is
    /// meaningless at this point and a session-shaped tail is dropped
    /// rather than misread as content, so data behind a missing final
    /// newline can be silently lost. Known limitation, kept faithful to
    /// the upstream protocol handling.
    pub fn decode_trailing(&self, line: &str) -> Option<StreamEvent> {
        let payload = Self::payload(line)?;
        if payload == TERMINATOR || payload.starts_with(SESSION_FRAME_PREFIX) {
            return None;
        }
        Some(StreamEvent::ContentFragment(unescape_newlines(payload)))
    }

    /// Extract the trimmed payload of a `data:` line, if it is one.
    fn payload(line: &str) -> Option<&str> {
        let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();
        if payload.is_empty() { None } else { Some(payload) }
    }
}

/// Replace every literal two-character `\n` sequence with a real newline.
fn unescape_newlines(payload: &str) -> String {
    payload.replace("\\n", "\n")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_data_lines_are_ignored() {
        let mut dec = EventDecoder::new();
        assert_eq!(dec.decode(""), None);
        assert_eq!(dec.decode("event: message"), None);
        assert_eq!(dec.decode(": keep-alive"), None);
        // The probe window is still open afterwards.
        assert_eq!(
            dec.decode(r#"data: {"sessionId":42}"#),
            Some(StreamEvent::SessionBound(42))
        );
    }

    #[test]
    fn empty_payload_is_ignored() {
        let mut dec = EventDecoder::new();
        assert_eq!(dec.decode("data:"), None);
        assert_eq!(dec.decode("data:   "), None);
    }

    #[test]
    fn terminator_decodes_before_session_probe() {
        let mut dec = EventDecoder::new();
        assert_eq!(dec.decode("data: [DONE]"), Some(StreamEvent::Terminated));
    }

    #[test]
    fn session_frame_binds_only_on_first_payload() {
        let mut dec = EventDecoder::new();
        assert_eq!(
            dec.decode(r#"data: {"sessionId":42}"#),
            Some(StreamEvent::SessionBound(42))
        );
        // Same shape later in the stream is plain content.
        assert_eq!(
            dec.decode(r#"data: {"sessionId":43}"#),
            Some(StreamEvent::ContentFragment(r#"{"sessionId":43}"#.into()))
        );
    }

    #[test]
    fn first_content_payload_closes_probe_window() {
        let mut dec = EventDecoder::new();
        assert_eq!(
            dec.decode("data: Hello"),
            Some(StreamEvent::ContentFragment("Hello".into()))
        );
        assert_eq!(
            dec.decode(r#"data: {"sessionId":42}"#),
            Some(StreamEvent::ContentFragment(r#"{"sessionId":42}"#.into()))
        );
    }

    #[test]
    fn malformed_session_frame_falls_back_to_content() {
        let mut dec = EventDecoder::new();
        let ev = dec.decode(r#"data: {"sessionId":"not-a-number"}"#);
        assert_eq!(
            ev,
            Some(StreamEvent::ContentFragment(
                r#"{"sessionId":"not-a-number"}"#.into()
            ))
        );
    }

    #[test]
    fn newline_escapes_are_resolved() {
        let mut dec = EventDecoder::new();
        assert_eq!(
            dec.decode(r"data: \nWorld"),
            Some(StreamEvent::ContentFragment("\nWorld".into()))
        );
        assert_eq!(
            dec.decode(r"data: a\nb\nc"),
            Some(StreamEvent::ContentFragment("a\nb\nc".into()))
        );
    }

    #[test]
    fn content_without_escapes_is_unchanged() {
        let mut dec = EventDecoder::new();
        dec.decode("data: open"); // close the probe window
        assert_eq!(
            dec.decode("data: plain text"),
            Some(StreamEvent::ContentFragment("plain text".into()))
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut dec = EventDecoder::new();
        dec.decode("data: open");
        assert_eq!(
            dec.decode("  data:   padded  "),
            Some(StreamEvent::ContentFragment("padded".into()))
        );
    }

    #[test]
    fn trailing_decode_recovers_content_only() {
        let dec = EventDecoder::new();
        assert_eq!(
            dec.decode_trailing("data: tail"),
            Some(StreamEvent::ContentFragment("tail".into()))
        );
        assert_eq!(dec.decode_trailing("data: [DONE]"), None);
        assert_eq!(dec.decode_trailing(r#"data: {"sessionId":42}"#), None);
        assert_eq!(dec.decode_trailing("not a data line"), None);
    }
}
