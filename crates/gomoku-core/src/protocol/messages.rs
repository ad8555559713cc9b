//! All Gomoku wire protocol message types.
//!
//! Every message travels as one JSON text frame shaped
//! `{"type": <u16 code>, "payload": {…}}`.  The numeric codes are grouped by
//! concern: 1xxx keepalive, 2xxx authentication, 3xxx rooms, 4xxx gameplay,
//! 5xxx rankings, 9999 server error.
//!
//! # Why separate client→server and server→client message types?
//!
//! The two directions carry different information: the client *sends*
//! requests, the server *sends* responses and pushed events.  Using two
//! distinct enums makes it a compile-time error to feed an outbound request
//! into the inbound dispatcher, and lets the dispatcher `match` exhaustively
//! over the closed set of things the server can say.
//!
//! Response payloads only distinguish success from failure through the
//! numeric `code` field ([`CODE_OK`]); there is no richer error taxonomy on
//! the wire.  Fields the server omits on failure are serde-defaulted.

use serde::{Deserialize, Serialize};

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Server-assigned user identifier, opaque to the client.
pub type UserId = String;

/// Server-assigned room identifier.
pub type RoomId = i64;

/// The `code` value every successful response carries.
pub const CODE_OK: i32 = 200;

// ── Message type codes ────────────────────────────────────────────────────────

/// All message type codes defined by the server protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum MessageType {
    // Keepalive (1xxx)
    Ping = 1000,
    Pong = 1001,
    // Authentication (2xxx)
    Login = 2001,
    LoginResp = 2002,
    Register = 2003,
    RegisterResp = 2004,
    // Rooms (3xxx)
    CreateRoom = 3001,
    JoinRoom = 3002,
    LeaveRoom = 3003,
    RoomList = 3004,
    CreateRoomResp = 3011,
    JoinRoomResp = 3012,
    LeaveRoomResp = 3013,
    RoomListResp = 3014,
    PlayerJoined = 3015,
    PlayerLeft = 3016,
    // Gameplay (4xxx)
    Move = 4001,
    MoveResp = 4002,
    GameOver = 4003,
    GameStart = 4004,
    BoardUpdate = 4005,
    Forfeit = 4006,
    ForfeitResp = 4007,
    // Rankings (5xxx)
    Leaderboard = 5001,
    LeaderboardResp = 5002,
    UserStats = 5003,
    UserStatsResp = 5004,
    // Reserved server error
    Error = 9999,
}

impl TryFrom<u16> for MessageType {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, ()> {
        match value {
            1000 => Ok(MessageType::Ping),
            1001 => Ok(MessageType::Pong),
            2001 => Ok(MessageType::Login),
            2002 => Ok(MessageType::LoginResp),
            2003 => Ok(MessageType::Register),
            2004 => Ok(MessageType::RegisterResp),
            3001 => Ok(MessageType::CreateRoom),
            3002 => Ok(MessageType::JoinRoom),
            3003 => Ok(MessageType::LeaveRoom),
            3004 => Ok(MessageType::RoomList),
            3011 => Ok(MessageType::CreateRoomResp),
            3012 => Ok(MessageType::JoinRoomResp),
            3013 => Ok(MessageType::LeaveRoomResp),
            3014 => Ok(MessageType::RoomListResp),
            3015 => Ok(MessageType::PlayerJoined),
            3016 => Ok(MessageType::PlayerLeft),
            4001 => Ok(MessageType::Move),
            4002 => Ok(MessageType::MoveResp),
            4003 => Ok(MessageType::GameOver),
            4004 => Ok(MessageType::GameStart),
            4005 => Ok(MessageType::BoardUpdate),
            4006 => Ok(MessageType::Forfeit),
            4007 => Ok(MessageType::ForfeitResp),
            5001 => Ok(MessageType::Leaderboard),
            5002 => Ok(MessageType::LeaderboardResp),
            5003 => Ok(MessageType::UserStats),
            5004 => Ok(MessageType::UserStatsResp),
            9999 => Ok(MessageType::Error),
            _ => Err(()),
        }
    }
}

// ── Client → server payloads ──────────────────────────────────────────────────

/// LOGIN (2001): password login or silent token re-authentication.
///
/// Exactly one of the two forms is sent: `{username, password}` on an
/// interactive login, `{token}` when replaying a persisted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginRequest {
    /// Interactive username/password login.
    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    /// Silent re-authentication with a persisted token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            username: None,
            password: None,
            token: Some(token.into()),
        }
    }
}

/// REGISTER (2003).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// CREATE_ROOM (3001).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub room_name: String,
}

/// JOIN_ROOM (3002).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub room_id: RoomId,
}

/// LEAVE_ROOM (3003).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoomRequest {
    pub room_id: RoomId,
}

/// MOVE (4001): place a stone at `(x, y)`, both in `[0, BOARD_SIZE)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub room_id: RoomId,
    pub x: usize,
    pub y: usize,
}

/// FORFEIT (4006): concede the current game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitRequest {
    pub room_id: RoomId,
}

/// LEADERBOARD (5001): request the top `limit` ranked players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    pub limit: u32,
}

/// USER_STATS (5003).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsRequest {
    pub user_id: UserId,
}

// ── Server → client payloads ──────────────────────────────────────────────────

/// LOGIN_RESP (2002).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// REGISTER_RESP (2004).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// CREATE_ROOM_RESP (3011).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

/// JOIN_ROOM_RESP (3012).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

/// LEAVE_ROOM_RESP (3013).
///
/// The handler clears the current room on *any* response; `code` is carried
/// for completeness but not consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoomResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// One room in a directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    pub room_id: RoomId,
    pub room_name: String,
    #[serde(default)]
    pub players: Vec<UserId>,
}

/// ROOM_LIST_RESP (3014): the full directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub code: i32,
    #[serde(default)]
    pub rooms: Vec<RoomEntry>,
}

/// PLAYER_JOINED (3015): pushed to the room creator when an opponent arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub username: UserId,
}

/// PLAYER_LEFT (3016): pushed when the opponent leaves the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLeft {
    pub username: UserId,
    #[serde(default)]
    pub reason: String,
}

/// MOVE_RESP (4002): server verdict on a submitted move.
///
/// Success is redundant with the following [`BoardUpdate`]; only a failure
/// code is surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// GAME_OVER (4003): authoritative end-of-game signal.
///
/// `win_line` is the winning five-stone line when the server includes it;
/// the client stores it verbatim for display and does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverNotice {
    pub winner: UserId,
    #[serde(default)]
    pub win_line: Option<Vec<i64>>,
}

/// GAME_START (4004): both seats are filled and the match begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStart {
    pub room_id: RoomId,
    pub players: Vec<UserId>,
    pub first_player: UserId,
}

/// BOARD_UPDATE (4005): full board replacement plus the new turn holder.
///
/// Cell values on the wire: 0 empty, 1 black, 2 white.  The last-move fields
/// are optional server extras used only to highlight the most recent stone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUpdate {
    pub board: Vec<Vec<u8>>,
    pub current_player: UserId,
    #[serde(default)]
    pub last_x: Option<i32>,
    #[serde(default)]
    pub last_y: Option<i32>,
    #[serde(default)]
    pub last_player: Option<UserId>,
}

/// FORFEIT_RESP (4007): acknowledgment only; the game outcome arrives as a
/// separate [`GameOverNotice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitResponse {
    pub code: i32,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub username: String,
    pub score: i64,
    #[serde(default)]
    pub win_rate: String,
    #[serde(default)]
    pub win_count: u32,
    #[serde(default)]
    pub lose_count: u32,
}

/// LEADERBOARD_RESP (5002).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub code: i32,
    #[serde(default)]
    pub ranks: Vec<RankEntry>,
}

/// USER_STATS_RESP (5004).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub code: i32,
    #[serde(default)]
    pub score: i64,
}

/// ERROR (9999): out-of-band server error, surfaced verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

// ── Directional message enums ─────────────────────────────────────────────────

/// Every message the client can send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Ping,
    Login(LoginRequest),
    Register(RegisterRequest),
    CreateRoom(CreateRoomRequest),
    JoinRoom(JoinRoomRequest),
    LeaveRoom(LeaveRoomRequest),
    RoomList,
    Move(MoveRequest),
    Forfeit(ForfeitRequest),
    Leaderboard(LeaderboardRequest),
    UserStats(UserStatsRequest),
}

impl ClientMessage {
    /// The wire code this message is enveloped with.
    pub fn message_type(&self) -> MessageType {
        match self {
            ClientMessage::Ping => MessageType::Ping,
            ClientMessage::Login(_) => MessageType::Login,
            ClientMessage::Register(_) => MessageType::Register,
            ClientMessage::CreateRoom(_) => MessageType::CreateRoom,
            ClientMessage::JoinRoom(_) => MessageType::JoinRoom,
            ClientMessage::LeaveRoom(_) => MessageType::LeaveRoom,
            ClientMessage::RoomList => MessageType::RoomList,
            ClientMessage::Move(_) => MessageType::Move,
            ClientMessage::Forfeit(_) => MessageType::Forfeit,
            ClientMessage::Leaderboard(_) => MessageType::Leaderboard,
            ClientMessage::UserStats(_) => MessageType::UserStats,
        }
    }
}

/// Every message the server can push to the client.
///
/// The dispatcher `match`es over this enum exhaustively, so adding a variant
/// is a compile error until every consumer handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Pong,
    LoginResp(LoginResponse),
    RegisterResp(RegisterResponse),
    CreateRoomResp(CreateRoomResponse),
    JoinRoomResp(JoinRoomResponse),
    LeaveRoomResp(LeaveRoomResponse),
    RoomListResp(RoomListResponse),
    PlayerJoined(PlayerJoined),
    PlayerLeft(PlayerLeft),
    MoveResp(MoveResponse),
    GameOver(GameOverNotice),
    GameStart(GameStart),
    BoardUpdate(BoardUpdate),
    ForfeitResp(ForfeitResponse),
    LeaderboardResp(LeaderboardResponse),
    UserStatsResp(UserStatsResponse),
    Error(ErrorNotice),
}

impl ServerMessage {
    /// The wire code this message arrived under.
    pub fn message_type(&self) -> MessageType {
        match self {
            ServerMessage::Pong => MessageType::Pong,
            ServerMessage::LoginResp(_) => MessageType::LoginResp,
            ServerMessage::RegisterResp(_) => MessageType::RegisterResp,
            ServerMessage::CreateRoomResp(_) => MessageType::CreateRoomResp,
            ServerMessage::JoinRoomResp(_) => MessageType::JoinRoomResp,
            ServerMessage::LeaveRoomResp(_) => MessageType::LeaveRoomResp,
            ServerMessage::RoomListResp(_) => MessageType::RoomListResp,
            ServerMessage::PlayerJoined(_) => MessageType::PlayerJoined,
            ServerMessage::PlayerLeft(_) => MessageType::PlayerLeft,
            ServerMessage::MoveResp(_) => MessageType::MoveResp,
            ServerMessage::GameOver(_) => MessageType::GameOver,
            ServerMessage::GameStart(_) => MessageType::GameStart,
            ServerMessage::BoardUpdate(_) => MessageType::BoardUpdate,
            ServerMessage::ForfeitResp(_) => MessageType::ForfeitResp,
            ServerMessage::LeaderboardResp(_) => MessageType::LeaderboardResp,
            ServerMessage::UserStatsResp(_) => MessageType::UserStatsResp,
            ServerMessage::Error(_) => MessageType::Error,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
