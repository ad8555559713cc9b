//! Domain entities for the Gomoku client.
//!
//! This module contains pure game logic with no infrastructure dependencies:
//! no sockets, no timers, no UI types.  Everything here mutates only in
//! response to values handed in by the caller, which keeps the whole state
//! machine testable from plain `#[test]` functions.
//!
//! - **`board`** – the fixed 15×15 grid and the cell/move primitives.
//! - **`game`** – the per-match state machine: lifecycle, turn ownership,
//!   positional colour assignment, and the local move pre-check.
//! - **`room`** – the lobby view: directory snapshots and the currently
//!   joined room.

pub mod board;
pub mod game;
pub mod room;
