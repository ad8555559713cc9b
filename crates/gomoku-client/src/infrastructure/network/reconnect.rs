//! Reconnection policy for the transport connector.
//!
//! The policy is injected into [`super::ServerConnection::start`], so a
//! different strategy (exponential backoff, capped retries) can be swapped
//! in without touching the connector itself.

use std::time::Duration;

/// Decides how long to wait before each connection attempt.
pub trait ReconnectPolicy: Send {
    /// Delay before the next attempt.  Called once per attempt, including
    /// the retry after an initial connection failure.
    fn next_delay(&mut self) -> Duration;

    /// Called after a connection is successfully established.
    fn reset(&mut self);
}

/// The production policy: a fixed delay, unconditionally.  No retry cap,
/// no backoff, no jitter.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// The delay the reference deployment uses between reconnect attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl ReconnectPolicy for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }

    fn reset(&mut self) {}
}

// ── Tests ─────────────────────────────────────────────────────────────────────
