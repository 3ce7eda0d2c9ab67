//! Cancellation and timeout supervision for one streaming request.

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Why a lifecycle was cancelled.
///
/// Both causes converge on the same cancellation token, so downstream
/// error handling sees them identically ([`ChatError::Cancelled`]); the
/// reason is recorded here for callers that want to tell them apart.
///
/// [`ChatError::Cancelled`]: scribe_types::ChatError::Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The user stopped generation.
    UserStop,
    /// The request timeout expired.
    Timeout,
}

/// Supervises one in-flight streaming request.
///
/// Owns a cancellation token and a timer that cancels on expiry. Lifetime
/// is exactly one request: created by the store when a send starts,
/// settled (timer disarmed) on completion or error, and dropped — never
/// reused, never ambient state.
pub struct StreamLifecycle {
    token: CancellationToken,
    timer: Mutex<Option<JoinHandle<()>>>,
    reason: OnceLock<CancelReason>,
}

impl StreamLifecycle {
    /// Create a lifecycle and arm its timeout timer.
    ///
    /// When the timer expires it invokes [`cancel`](Self::cancel) with
    /// [`CancelReason::Timeout`]. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn start(timeout: Duration) -> Arc<Self> {
        let lifecycle = Arc::new(Self {
            token: CancellationToken::new(),
            timer: Mutex::new(None),
            reason: OnceLock::new(),
        });

        // The timer holds only a weak reference so a dropped lifecycle
        // cannot be kept alive by its own timeout.
        let weak: Weak<Self> = Arc::downgrade(&lifecycle);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(lifecycle) = weak.upgrade() {
                lifecycle.cancel(CancelReason::Timeout);
            }
        });
        *lifecycle.timer.lock().expect("timer lock poisoned") = Some(handle);

        lifecycle
    }

    /// A clone of the cancellation token for the read loop to select on.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel the in-flight request. Idempotent: the first call records
    /// the reason, triggers the token, and disarms the timer; later calls
    /// are no-ops regardless of their reason.
    pub fn cancel(&self, reason: CancelReason) {
        if self.token.is_cancelled() {
            return;
        }
        let _ = self.reason.set(reason);
        self.token.cancel();
        self.disarm();
    }

    /// Mark the request settled (completed or failed), disarming the timer
    /// so a late timeout cannot fire after the stream already finished.
    pub fn settled(&self) {
        self.disarm();
    }

    /// Whether the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded cancellation reason, if any.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    fn disarm(&self) {
        if let Some(handle) = self.timer.lock().expect("timer lock poisoned").take() {
            handle.abort();
        }
    }
}

impl Drop for StreamLifecycle {
    fn drop(&mut self) {
        self.disarm();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
