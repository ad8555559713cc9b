//! The per-match game session state machine.
//!
//! Lifecycle: `Waiting → Active → Over`, then back to `Waiting` when the
//! user returns to the lobby.  All transitions are driven by server events;
//! the only local decision this module makes is the *pre-check* that gates a
//! move before it is sent.  The board is never mutated optimistically; the
//! mover sees their own stone only once the server echoes a board broadcast.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::board::{Board, BoardError, Move};
use crate::protocol::messages::{BoardUpdate, GameOverNotice, GameStart, RoomId, UserId};

/// Why a locally submitted move was rejected before reaching the wire.
///
/// These rejections are silent no-ops at the transport: nothing is sent, and
/// authority over legality stays entirely with the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveRejection {
    #[error("no game is in progress")]
    GameNotActive,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("({x}, {y}) is already occupied")]
    CellOccupied { x: usize, y: usize },
}

/// A server event that cannot be reconciled with the session invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// GameStart must name exactly two players.
    #[error("game started with {0} players; expected 2")]
    InvalidPlayerCount(usize),

    /// The turn holder named by the server is not seated in this game.
    #[error("turn holder {0:?} is not one of the seated players")]
    UnknownTurnHolder(UserId),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Stone colour, assigned positionally at game start and immutable for the
/// session's lifetime: `players[0]` is always Black, `players[1]` White.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
}

/// Lifecycle of a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Waiting,
    Active,
    Over,
}

/// End-of-game result framed relative to the local user.
///
/// The wire carries only a winner id; there is no draw and no third outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// The live state of one in-progress or concluded match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    room_id: RoomId,
    players: [UserId; 2],
    current_player: UserId,
    board: Board,
    status: GameStatus,
    winner: Option<UserId>,
    win_line: Option<Vec<i64>>,
    last_move: Option<Move>,
}

impl GameSession {
    /// Creates an Active session from a GameStart event: all-empty board,
    /// turn with `first_player`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the event does not name exactly two players,
    /// or names a first player who is not seated.
    pub fn start(event: GameStart) -> Result<Self, GameError> {
        let GameStart {
            room_id,
            players,
            first_player,
        } = event;

        let [black, white]: [UserId; 2] = players
            .try_into()
            .map_err(|p: Vec<UserId>| GameError::InvalidPlayerCount(p.len()))?;

        if first_player != black && first_player != white {
            return Err(GameError::UnknownTurnHolder(first_player));
        }

        Ok(Self {
            room_id,
            players: [black, white],
            current_player: first_player,
            board: Board::new(),
            status: GameStatus::Active,
            winner: None,
            win_line: None,
            last_move: None,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[UserId; 2] {
        &self.players
    }

    pub fn current_player(&self) -> &UserId {
        &self.current_player
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn win_line(&self) -> Option<&[i64]> {
        self.win_line.as_deref()
    }

    /// The colour `user` plays, or `None` if they are not seated.
    ///
    /// Purely positional: seat 0 is Black regardless of who moves first.
    pub fn stone_of(&self, user: &UserId) -> Option<Stone> {
        if *user == self.players[0] {
            Some(Stone::Black)
        } else if *user == self.players[1] {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// Whether `user` currently holds the turn in an active game.
    pub fn is_turn_of(&self, user: &UserId) -> bool {
        self.status == GameStatus::Active && self.current_player == *user
    }

    /// The local pre-check applied before a move request is sent.
    ///
    /// Rejections are checked cheapest-first; the server remains the sole
    /// authority on legality.
    ///
    /// # Errors
    ///
    /// Returns the first applicable [`MoveRejection`].
    pub fn check_move(&self, local: &UserId, mv: Move) -> Result<(), MoveRejection> {
        if self.status != GameStatus::Active {
            return Err(MoveRejection::GameNotActive);
        }
        if self.current_player != *local {
            return Err(MoveRejection::NotYourTurn);
        }
        if !mv.in_bounds() {
            return Err(MoveRejection::OutOfBounds { x: mv.x, y: mv.y });
        }
        if !self.board.is_open(mv) {
            return Err(MoveRejection::CellOccupied { x: mv.x, y: mv.y });
        }
        Ok(())
    }

    /// Applies a board broadcast: the grid is replaced wholesale (no merge)
    /// and the turn passes to `current_player`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the snapshot is malformed or the new turn
    /// holder is not seated; the session is left unchanged in that case.
    pub fn apply_board_update(&mut self, update: BoardUpdate) -> Result<(), GameError> {
        let board = Board::from_wire(&update.board)?;

        if self.stone_of(&update.current_player).is_none() {
            return Err(GameError::UnknownTurnHolder(update.current_player));
        }

        self.board = board;
        self.current_player = update.current_player;
        self.last_move = match (update.last_x, update.last_y) {
            (Some(x), Some(y)) if x >= 0 && y >= 0 => Some(Move {
                x: x as usize,
                y: y as usize,
            }),
            _ => None,
        };
        Ok(())
    }

    /// Applies the authoritative GameOver event and transitions to `Over`.
    ///
    /// This is also the only signal acted on after a forfeit request; the
    /// forfeit acknowledgment itself carries no outcome.
    pub fn finish(&mut self, event: GameOverNotice) {
        self.status = GameStatus::Over;
        self.winner = Some(event.winner);
        self.win_line = event.win_line;
    }

    /// The outcome relative to `local`, once the game is over.
    pub fn outcome_for(&self, local: &UserId) -> Option<GameOutcome> {
        match (&self.status, &self.winner) {
            (GameStatus::Over, Some(winner)) if winner == local => Some(GameOutcome::Won),
            (GameStatus::Over, Some(_)) => Some(GameOutcome::Lost),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
