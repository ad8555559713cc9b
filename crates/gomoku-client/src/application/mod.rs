//! Application layer: client state and the use cases that mutate it.
//!
//! All state lives in one [`context::ClientContext`] owned by the dispatch
//! loop; there is no module-level mutable state anywhere.  The per-concern
//! modules group the operations:
//!
//! - **`session`** – authentication: login, token re-auth, register, logout,
//!   and the post-login refresh cascade.
//! - **`rooms`** – the room directory: create/join/leave, snapshot refresh,
//!   seat notifications.
//! - **`game`** – the match state machine: move submission with local
//!   pre-checks, forfeit, and the server-driven lifecycle events.
//! - **`dispatcher`** – routes decoded server messages to the handlers
//!   above, exhaustively over the closed message set.

pub mod context;
pub mod dispatcher;
pub mod game;
pub mod rooms;
pub mod session;

pub use context::{AppView, ClientContext, CredentialStore, MessageSink, Notifier, StorageError};
pub use dispatcher::{handle_network_event, handle_server_message};
