//! # gomoku-core
//!
//! Shared library for the Gomoku client runtime containing the wire protocol
//! types, the JSON envelope codec, and the pure game domain logic.
//!
//! This crate has zero dependencies on sockets, timers, or UI frameworks.
//! Everything here can be exercised from a plain unit test.
//!
//! # Architecture overview (for beginners)
//!
//! Gomoku (five-in-a-row) is played between two players on a fixed 15×15
//! grid.  The *server* is authoritative: it runs matchmaking, validates
//! moves, and detects wins.  The *client* (the code this workspace builds)
//! keeps a local mirror of session, room, and game state that is updated
//! exclusively from server-pushed events.
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`protocol`** – What travels over the wire.  Every message is one JSON
//!   text frame shaped `{"type": <code>, "payload": {…}}`, decoded into
//!   typed Rust structs on arrival.
//!
//! - **`domain`** – Pure business logic with no I/O.  The most important
//!   piece is the `GameSession` state machine: board snapshots, turn
//!   ownership, and the local pre-checks that gate a move before it is ever
//!   sent to the server.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `gomoku_core::GameSession` instead of `gomoku_core::domain::game::GameSession`.
pub use domain::board::{Board, BoardError, Cell, Move, BOARD_SIZE};
pub use domain::game::{GameOutcome, GameSession, GameStatus, MoveRejection, Stone};
pub use domain::room::{CurrentRoom, Room, RoomDirectory, ROOM_CAPACITY};
pub use protocol::codec::{decode_server, encode_client, ProtocolError};
pub use protocol::messages::{ClientMessage, MessageType, RoomId, ServerMessage, UserId, CODE_OK};
