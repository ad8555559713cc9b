//! The client session context and the collaborator ports it talks through.
//!
//! `ClientContext` is the explicit, single owner of all mutable client
//! state: the authenticated session, the room directory snapshot, the
//! current room, and the live game.  It is threaded by `&mut` through every
//! handler, which, together with the single dispatch loop, gives the whole
//! runtime its "no concurrent writers, no locking" property.
//!
//! The collaborators (transport, notifier, credential store) are consumed
//! behind small traits so the application layer can be unit-tested with
//! recording fakes, and so the infrastructure implementations stay swappable.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use gomoku_core::protocol::messages::{
    ClientMessage, LeaderboardRequest, RankEntry, UserId, UserStatsRequest,
};
use gomoku_core::{CurrentRoom, GameSession, RoomDirectory};

/// How many leaderboard rows the refresh cascade requests.
pub const LEADERBOARD_LIMIT: u32 = 10;

// ── Collaborator ports ────────────────────────────────────────────────────────

/// Outbound edge of the transport connector.
///
/// `send` is best-effort by design: when the channel is not open the message
/// is dropped silently, with no queueing and no retry.  Implementations must
/// never block.
pub trait MessageSink: Send + Sync {
    fn send(&self, msg: &ClientMessage);
}

/// Surfaces blocking messages to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Shows `text` as a blocking notification.  Concurrent notifications
    /// are not queued; the latest overwrites any pending one.
    fn blocking_message(&self, text: &str);
}

/// Errors from the credential store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error accessing credentials at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists a single opaque auth token across restarts.
pub trait CredentialStore: Send + Sync {
    /// The persisted token, if any.
    fn load(&self) -> Option<String>;

    /// Persists `token`, replacing any previous one.
    fn store(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the persisted token.  Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

// ── Client state ──────────────────────────────────────────────────────────────

/// Which top-level view the user is looking at.  Mirrors the page routing of
/// the reference front end; a renderer consumes this to pick what to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Auth,
    Lobby,
    Room,
    Game,
}

/// Authenticated identity state for the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub token: String,
}

/// The single owner of all mutable client state.
pub struct ClientContext {
    sink: Arc<dyn MessageSink>,
    notifier: Arc<dyn Notifier>,
    credentials: Arc<dyn CredentialStore>,

    pub(crate) session: Option<Session>,
    pub(crate) directory: RoomDirectory,
    pub(crate) current_room: Option<CurrentRoom>,
    pub(crate) game: Option<GameSession>,
    pub(crate) view: AppView,
    pub(crate) connected: bool,

    // Lobby sidebar data, refreshed by the cascade.
    pub(crate) score: Option<i64>,
    pub(crate) leaderboard: Vec<RankEntry>,
}

impl ClientContext {
    pub fn new(
        sink: Arc<dyn MessageSink>,
        notifier: Arc<dyn Notifier>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            sink,
            notifier,
            credentials,
            session: None,
            directory: RoomDirectory::new(),
            current_room: None,
            game: None,
            view: AppView::Auth,
            connected: false,
            score: None,
            leaderboard: Vec::new(),
        }
    }

    // ── Read-only views (consumed by the UI bridge and tests) ────────────────

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn current_room(&self) -> Option<&CurrentRoom> {
        self.current_room.as_ref()
    }

    pub fn game(&self) -> Option<&GameSession> {
        self.game.as_ref()
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn leaderboard(&self) -> &[RankEntry] {
        &self.leaderboard
    }

    // ── Shared helpers ───────────────────────────────────────────────────────

    /// Hands an outbound message to the transport.  Best-effort: the sink
    /// drops it when the channel is not open.
    pub(crate) fn send(&self, msg: &ClientMessage) {
        debug!("sending {:?}", msg.message_type());
        self.sink.send(msg);
    }

    pub(crate) fn notify(&self, text: &str) {
        self.notifier.blocking_message(text);
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    /// The post-transition refresh cascade: user stats, room list,
    /// leaderboard.  Emitted after a successful login and again when the
    /// user returns to the lobby from a finished game.
    pub(crate) fn refresh_cascade(&self, user_id: &UserId) {
        self.send(&ClientMessage::UserStats(UserStatsRequest {
            user_id: user_id.clone(),
        }));
        self.send(&ClientMessage::RoomList);
        self.send(&ClientMessage::Leaderboard(LeaderboardRequest {
            limit: LEADERBOARD_LIMIT,
        }));
    }
}
