//! Infrastructure layer for the client runtime.
//!
//! Contains everything that touches the outside world: the WebSocket
//! transport, the keepalive timer, file-backed credential and config
//! storage, and the bridge the UI consumes.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gomoku_core`, but MUST NOT be imported by the application or domain
//! layers; the application talks to it only through the collaborator
//! traits defined in `application::context`.
//!
//! # Sub-modules
//!
//! - **`network`** – the transport connector: owns the WebSocket lifecycle,
//!   decodes inbound frames, drops outbound messages while closed, and
//!   reconnects forever on a pluggable delay policy.
//!
//! - **`heartbeat`** – emits a keepalive ping on a fixed period.
//!
//! - **`storage`** – the TOML config file and the persisted auth token.
//!
//! - **`ui_bridge`** – collaborator contracts for a front end: the board
//!   renderer seam, click-to-coordinate mapping, and notifier impls.

pub mod heartbeat;
pub mod network;
pub mod storage;
pub mod ui_bridge;
