//! Room directory client: the lobby snapshot and room membership.
//!
//! The protocol carries no room version or sequence number, so a seat
//! notification and a directory refresh that race resolve last-write-wins:
//! whichever is processed later stands.  See the DESIGN notes; this is an
//! accepted limitation of the wire contract, mirrored here deliberately.

use tracing::{debug, warn};

use gomoku_core::protocol::messages::{
    ClientMessage, CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse,
    LeaveRoomRequest, LeaveRoomResponse, PlayerJoined, PlayerLeft, RoomId, RoomListResponse,
    CODE_OK,
};
use gomoku_core::CurrentRoom;

use crate::application::context::{AppView, ClientContext};

impl ClientContext {
    // ── User actions ─────────────────────────────────────────────────────────

    /// Requests creation of a new room.  The room is entered only once the
    /// server confirms.
    pub fn create_room(&mut self, name: &str) {
        self.send(&ClientMessage::CreateRoom(CreateRoomRequest {
            room_name: name.to_string(),
        }));
    }

    /// Requests to join `room_id`.
    pub fn join_room(&mut self, room_id: RoomId) {
        self.send(&ClientMessage::JoinRoom(JoinRoomRequest { room_id }));
    }

    /// Requests to leave the current room.  A no-op when not in a room.
    pub fn leave_room(&mut self) {
        let Some(room) = self.current_room.as_ref() else {
            return;
        };
        self.send(&ClientMessage::LeaveRoom(LeaveRoomRequest { room_id: room.id }));
    }

    /// Re-requests the full directory snapshot.
    pub fn request_room_list(&mut self) {
        self.send(&ClientMessage::RoomList);
    }

    // ── Server response handlers ─────────────────────────────────────────────

    pub(crate) fn handle_create_room_resp(&mut self, resp: CreateRoomResponse) {
        if resp.code != CODE_OK {
            self.notify(&resp.message);
            return;
        }
        let Some(room_id) = resp.room_id else {
            warn!("create-room success without room_id; ignoring");
            return;
        };
        let Some(session) = self.session.as_ref() else {
            warn!("create-room response without a session; ignoring");
            return;
        };

        // Creator takes seat 0; seat 1 stays vacant pending a join notice.
        self.current_room = Some(CurrentRoom::created_by(room_id, session.user_id.clone()));
        self.view = AppView::Room;
    }

    pub(crate) fn handle_join_room_resp(&mut self, resp: JoinRoomResponse) {
        if resp.code != CODE_OK {
            self.notify(&resp.message);
            return;
        }
        let Some(room_id) = resp.room_id else {
            warn!("join-room success without room_id; ignoring");
            return;
        };

        self.current_room = Some(CurrentRoom::joined(room_id));
        self.view = AppView::Room;
        // Keep the directory consistent with the seat we just took.
        self.request_room_list();
    }

    /// Any leave response clears the current room; the handler does not
    /// distinguish success from failure, which makes repeated leaves
    /// idempotent.
    pub(crate) fn handle_leave_room_resp(&mut self, _resp: LeaveRoomResponse) {
        self.current_room = None;
        self.game = None;
        self.view = AppView::Lobby;
        self.request_room_list();
    }

    /// Replaces the directory snapshot wholesale; no per-room diffing.
    pub(crate) fn handle_room_list_resp(&mut self, resp: RoomListResponse) {
        debug!("directory snapshot: {} rooms", resp.rooms.len());
        self.directory.replace_all(resp.rooms);
    }

    pub(crate) fn handle_player_joined(&mut self, notice: PlayerJoined) {
        if let Some(room) = self.current_room.as_mut() {
            room.seat_opponent(notice.username);
        }
    }

    pub(crate) fn handle_player_left(&mut self, notice: PlayerLeft) {
        debug!("opponent {} left: {}", notice.username, notice.reason);
        if let Some(room) = self.current_room.as_mut() {
            room.vacate_opponent();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gomoku_core::protocol::messages::{LoginResponse, MessageType, RoomEntry};

    use super::*;
    use crate::application::context::{MessageSink, Notifier};
    use crate::infrastructure::network::RecordingSink;
    use crate::infrastructure::storage::credentials::MemoryCredentialStore;
    use crate::infrastructure::ui_bridge::RecordingNotifier;

    fn logged_in_context() -> (ClientContext, Arc<RecordingSink>, Arc<RecordingNotifier>) {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut ctx = ClientContext::new(
            Arc::clone(&sink) as Arc<dyn MessageSink>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(MemoryCredentialStore::default()),
        );
        ctx.handle_login_resp(LoginResponse {
            code: CODE_OK,
            message: String::new(),
            token: Some("T1".to_string()),
            user_id: Some("alice".to_string()),
        });
        sink.drain();
        (ctx, sink, notifier)
    }

    fn entry(id: RoomId, name: &str) -> RoomEntry {
        RoomEntry {
            room_id: id,
            room_name: name.to_string(),
            players: Vec::new(),
        }
    }

    // ── create ───────────────────────────────────────────────────────────────

    #[test]
    fn test_create_room_success_seats_creator_first() {
        // Arrange
        let (mut ctx, _, _) = logged_in_context();

        // Act – createRoom("alice的房间") answered with {code:200,room_id:42}
        ctx.create_room("alice的房间");
        ctx.handle_create_room_resp(CreateRoomResponse {
            code: CODE_OK,
            message: String::new(),
            room_id: Some(42),
        });

        // Assert
        let room = ctx.current_room().unwrap();
        assert_eq!(room.id, 42);
        assert_eq!(room.seats[0].as_deref(), Some("alice"));
        assert_eq!(room.seats[1], None, "second seat is a placeholder");
        assert_eq!(ctx.view(), AppView::Room);
    }

    #[test]
    fn test_create_room_failure_surfaces_message() {
        let (mut ctx, _, notifier) = logged_in_context();

        ctx.handle_create_room_resp(CreateRoomResponse {
            code: 500,
            message: "too many rooms".to_string(),
            room_id: None,
        });

        assert!(ctx.current_room().is_none());
        assert_eq!(notifier.messages(), vec!["too many rooms"]);
    }

    // ── join ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_join_room_success_enters_room_and_refreshes_directory() {
        let (mut ctx, sink, _) = logged_in_context();

        ctx.handle_join_room_resp(JoinRoomResponse {
            code: CODE_OK,
            message: String::new(),
            room_id: Some(7),
        });

        assert_eq!(ctx.current_room().unwrap().id, 7);
        assert_eq!(ctx.view(), AppView::Room);
        // The join handler immediately re-requests the room list.
        let types: Vec<MessageType> = sink.sent().iter().map(|m| m.message_type()).collect();
        assert_eq!(types, vec![MessageType::RoomList]);
    }

    #[test]
    fn test_join_room_failure_stays_in_lobby() {
        let (mut ctx, sink, notifier) = logged_in_context();

        ctx.handle_join_room_resp(JoinRoomResponse {
            code: 409,
            message: "room full".to_string(),
            room_id: None,
        });

        assert!(ctx.current_room().is_none());
        assert_eq!(notifier.messages(), vec!["room full"]);
        assert!(sink.sent().is_empty());
    }

    // ── leave ────────────────────────────────────────────────────────────────

    #[test]
    fn test_leave_room_response_clears_room_unconditionally() {
        let (mut ctx, sink, _) = logged_in_context();
        ctx.handle_create_room_resp(CreateRoomResponse {
            code: CODE_OK,
            message: String::new(),
            room_id: Some(42),
        });
        sink.drain();

        // Act – even a failure code clears the room
        ctx.handle_leave_room_resp(LeaveRoomResponse {
            code: 500,
            message: "not in a room".to_string(),
        });

        assert!(ctx.current_room().is_none());
        assert_eq!(ctx.view(), AppView::Lobby);
    }

    #[test]
    fn test_leave_room_response_is_idempotent() {
        let (mut ctx, _, _) = logged_in_context();

        // Two consecutive responses (e.g. a stale one from a prior room).
        ctx.handle_leave_room_resp(LeaveRoomResponse {
            code: CODE_OK,
            message: String::new(),
        });
        ctx.handle_leave_room_resp(LeaveRoomResponse {
            code: CODE_OK,
            message: String::new(),
        });

        assert!(ctx.current_room().is_none());
        assert_eq!(ctx.view(), AppView::Lobby);
    }

    #[test]
    fn test_leave_room_action_requires_a_current_room() {
        let (mut ctx, sink, _) = logged_in_context();

        ctx.leave_room();

        assert!(sink.sent().is_empty(), "no request without a room");
    }

    // ── directory ────────────────────────────────────────────────────────────

    #[test]
    fn test_room_list_response_replaces_snapshot() {
        let (mut ctx, _, _) = logged_in_context();

        ctx.handle_room_list_resp(RoomListResponse {
            code: CODE_OK,
            rooms: vec![entry(1, "a"), entry(2, "b")],
        });
        ctx.handle_room_list_resp(RoomListResponse {
            code: CODE_OK,
            rooms: vec![entry(3, "c")],
        });

        assert_eq!(ctx.directory().len(), 1);
        assert!(ctx.directory().get(3).is_some());
        assert!(ctx.directory().get(1).is_none());
    }

    // ── seat notifications ───────────────────────────────────────────────────

    #[test]
    fn test_player_joined_fills_second_seat_only() {
        let (mut ctx, _, _) = logged_in_context();
        ctx.handle_create_room_resp(CreateRoomResponse {
            code: CODE_OK,
            message: String::new(),
            room_id: Some(42),
        });

        ctx.handle_player_joined(PlayerJoined {
            username: "bob".to_string(),
        });

        let room = ctx.current_room().unwrap();
        assert_eq!(room.seats[0].as_deref(), Some("alice"));
        assert_eq!(room.seats[1].as_deref(), Some("bob"));
    }

    #[test]
    fn test_player_left_vacates_second_seat() {
        let (mut ctx, _, _) = logged_in_context();
        ctx.handle_create_room_resp(CreateRoomResponse {
            code: CODE_OK,
            message: String::new(),
            room_id: Some(42),
        });
        ctx.handle_player_joined(PlayerJoined {
            username: "bob".to_string(),
        });

        ctx.handle_player_left(PlayerLeft {
            username: "bob".to_string(),
            reason: String::new(),
        });

        assert_eq!(ctx.current_room().unwrap().seats[1], None);
    }

    #[test]
    fn test_seat_notification_without_room_is_dropped() {
        let (mut ctx, _, _) = logged_in_context();

        // A stale notification arriving after the room was left.
        ctx.handle_player_joined(PlayerJoined {
            username: "bob".to_string(),
        });

        assert!(ctx.current_room().is_none());
    }
}
