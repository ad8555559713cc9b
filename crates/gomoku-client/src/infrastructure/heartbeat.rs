//! Heartbeat monitor: a one-directional keepalive.
//!
//! Emits a `Ping` on a fixed period.  There is no pong or liveness
//! tracking: a half-open connection (server unresponsive, socket not yet
//! closed) is not detected here; detection relies entirely on the
//! transport's own close event.  While the channel is closed the sink
//! drops the ping on the floor, which is exactly the intended behaviour.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use gomoku_core::protocol::messages::ClientMessage;

use crate::application::context::MessageSink;

/// The period the reference deployment pings on.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

/// Spawns the keepalive task.  Runs until aborted.
pub fn spawn_heartbeat(sink: Arc<dyn MessageSink>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of `interval` fires immediately; the heartbeat
        // starts one full period after spawn instead.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sink.send(&ClientMessage::Ping);
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
