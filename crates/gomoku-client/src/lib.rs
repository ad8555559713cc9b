//! gomoku-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the client runtime do?
//!
//! The server is authoritative for everything that matters: matchmaking,
//! move legality, win detection.  This crate keeps the local mirror of
//! session, room, and game state consistent with server-pushed events while
//! tolerating network drops, and gates user actions against locally-known
//! state before they ever reach the wire:
//!
//! 1. Connects over WebSocket and silently re-authenticates with a persisted
//!    token when one exists.
//! 2. Dispatches every inbound frame to the session / room / game handlers,
//!    which are the only writers of client state.
//! 3. Validates moves locally (turn ownership, bounds, cell emptiness) to
//!    avoid obviously wasted round trips, without ever mutating the board
//!    optimistically.
//! 4. Reconnects on close after a fixed delay, forever, and keeps the
//!    channel warm with a periodic keepalive ping.

/// Application layer: the session context and the per-concern use cases.
pub mod application;

/// Infrastructure layer: WebSocket transport, heartbeat, storage, UI bridge.
pub mod infrastructure;
