#![deny(missing_docs)]
//! Shared types for the scribe chat client.
//!
//! Everything the wire decoder, the HTTP client, and the chat store agree
//! on lives here: the message/session data model, the transient stream
//! events, the error taxonomy, and the notification seam the host UI
//! plugs into.

pub mod error;
pub mod event;
pub mod notice;
pub mod types;

pub use error::*;
pub use event::*;
pub use notice::*;
pub use types::*;
