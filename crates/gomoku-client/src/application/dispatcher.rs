//! Routes inbound network events to the state handlers.
//!
//! Dispatch is an exhaustive `match` over the closed [`ServerMessage`] enum
//! rather than a runtime handler map: adding a message variant without
//! routing it is a compile error, and there is nothing to register or
//! unregister.  Frames whose type code is unknown never get here; the
//! transport drops them at decode time.

use tracing::{debug, info, warn};

use gomoku_core::protocol::messages::ServerMessage;

use crate::application::context::ClientContext;
use crate::infrastructure::network::NetworkEvent;

/// Handles one event from the transport connector.
///
/// Called only from the single dispatch loop, which is what serialises all
/// state mutation.
pub fn handle_network_event(ctx: &mut ClientContext, event: NetworkEvent) {
    match event {
        NetworkEvent::Connected => {
            info!("channel open");
            ctx.connected = true;
            // Silent re-authentication: replay the persisted token, if any.
            if let Some(token) = ctx.credentials().load() {
                debug!("replaying persisted token");
                ctx.login_with_token(&token);
            }
        }
        NetworkEvent::Disconnected => {
            warn!("channel closed; reconnect scheduled");
            ctx.connected = false;
        }
        NetworkEvent::MessageReceived(msg) => handle_server_message(ctx, msg),
    }
}

/// Routes one decoded server message to its handler.
pub fn handle_server_message(ctx: &mut ClientContext, msg: ServerMessage) {
    debug!("dispatching {:?}", msg.message_type());
    match msg {
        ServerMessage::Pong => { /* fire-and-forget heartbeat; nothing tracked */ }

        ServerMessage::LoginResp(resp) => ctx.handle_login_resp(resp),
        ServerMessage::RegisterResp(resp) => ctx.handle_register_resp(resp),

        ServerMessage::CreateRoomResp(resp) => ctx.handle_create_room_resp(resp),
        ServerMessage::JoinRoomResp(resp) => ctx.handle_join_room_resp(resp),
        ServerMessage::LeaveRoomResp(resp) => ctx.handle_leave_room_resp(resp),
        ServerMessage::RoomListResp(resp) => ctx.handle_room_list_resp(resp),
        ServerMessage::PlayerJoined(notice) => ctx.handle_player_joined(notice),
        ServerMessage::PlayerLeft(notice) => ctx.handle_player_left(notice),

        ServerMessage::MoveResp(resp) => ctx.handle_move_resp(resp),
        ServerMessage::GameStart(event) => ctx.handle_game_start(event),
        ServerMessage::BoardUpdate(update) => ctx.handle_board_update(update),
        ServerMessage::GameOver(event) => ctx.handle_game_over(event),
        ServerMessage::ForfeitResp(resp) => ctx.handle_forfeit_resp(resp),

        ServerMessage::LeaderboardResp(resp) => ctx.handle_leaderboard_resp(resp),
        ServerMessage::UserStatsResp(resp) => ctx.handle_user_stats_resp(resp),

        ServerMessage::Error(notice) => ctx.notify(&notice.message),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
