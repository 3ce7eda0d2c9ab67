//! Adapter from a raw byte-chunk stream to decoded [`StreamEvent`]s.

use bytes::Bytes;
use futures::{Stream, StreamExt};

use scribe_types::{ChatError, StreamEvent};

use crate::decoder::EventDecoder;
use crate::line_buffer::LineBuffer;

/// Decode a raw byte stream into an ordered stream of [`StreamEvent`]s.
///
/// Drives all decoding state internally: chunks are reassembled into lines
/// by a [`LineBuffer`], each line is classified by an [`EventDecoder`], and
/// events are emitted in exactly the byte order received. The stream
/// completes when [`StreamEvent::Terminated`] is decoded (any lines still
/// buffered from the same chunk are discarded), when the underlying byte
/// stream ends, or on a read error.
///
/// At natural end of transport the final unterminated line, if any, is
/// flushed through the decoder once, best-effort.
pub fn event_stream<S, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<StreamEvent, ChatError>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = EventDecoder::new();
        let mut lines = LineBuffer::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(ChatError::Generic(format!("stream read error: {e}")));
                    return;
                }
            };

            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield Err(ChatError::Generic(format!("UTF-8 decode error: {e}")));
                    return;
                }
            };

            for line in lines.push(chunk_str) {
                match decoder.decode(&line) {
                    Some(StreamEvent::Terminated) => {
                        // Early exit: lines buffered behind the terminator
                        // are never processed.
                        yield Ok(StreamEvent::Terminated);
                        return;
                    }
                    Some(event) => yield Ok(event),
                    None => {}
                }
            }
        }

        // Best-effort flush of an unterminated final line.
        if let Some(tail) = lines.flush() {
            if let Some(event) = decoder.decode_trailing(&tail) {
                yield Ok(event);
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
