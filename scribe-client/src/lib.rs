#![deny(missing_docs)]
//! Streaming chat client and session store for the scribe backend.
//!
//! The pieces, leaf-first:
//!
//! - [`StreamLifecycle`] — one cancellation token and one timeout timer per
//!   in-flight request; user stop and timeout converge on the same cancel.
//! - [`ChatTransport`] — the seam between the store and the network; the
//!   reqwest-backed [`ChatClient`] is the production implementation.
//! - [`ChatStore`] — single-flight streaming state machine: owns the
//!   message list and session id, drives the read loop, maps decoded
//!   events and terminal conditions onto user-visible state.

pub mod client;
pub mod config;
mod error;
pub mod lifecycle;
pub mod notify;
pub mod store;
pub mod transport;

pub use client::ChatClient;
pub use config::StoreConfig;
pub use lifecycle::{CancelReason, StreamLifecycle};
pub use notify::{LogSink, NullSink};
pub use store::ChatStore;
pub use transport::ChatTransport;
