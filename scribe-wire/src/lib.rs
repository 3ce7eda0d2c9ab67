#![deny(missing_docs)]
//! Incremental decoder for the scribe chat wire protocol.
//!
//! The response body of a streaming send arrives as arbitrary byte chunks
//! carrying a line-oriented protocol: only lines prefixed `data:` are
//! meaningful, `[DONE]` terminates the stream, the first payload may be a
//! session-binding JSON frame, and everything else is content with `\n`
//! escape pairs. This crate turns chunks into [`StreamEvent`]s:
//!
//! bytes → [`LineBuffer`] → [`EventDecoder`] → events
//!
//! Chunk boundaries carry no meaning; decoding a body as one chunk or
//! split at every byte yields the same event sequence.
//!
//! This is not an SSE-compliant client: `event:`/`id:` fields and
//! reconnection semantics are not honored. It decodes exactly this one
//! protocol for the lifetime of a single request.

pub mod decoder;
pub mod line_buffer;
pub mod stream;

pub use decoder::EventDecoder;
pub use line_buffer::LineBuffer;
pub use stream::event_stream;

#[doc(no_inline)]
pub use scribe_types::StreamEvent;
