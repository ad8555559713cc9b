//! Game session use case: move submission, forfeit, and the server-driven
//! match lifecycle.
//!
//! The pre-checks here exist to avoid obviously wasted round trips; every
//! decision that matters is the server's.  In particular the local board is
//! never mutated optimistically; the mover sees their own stone only after
//! the server echoes a board broadcast.

use tracing::{debug, info, warn};

use gomoku_core::protocol::messages::{
    BoardUpdate, ClientMessage, ForfeitRequest, ForfeitResponse, GameOverNotice, GameStart,
    MoveRequest, MoveResponse, CODE_OK,
};
use gomoku_core::{GameOutcome, GameSession, Move, MoveRejection};

use crate::application::context::{AppView, ClientContext};

impl ClientContext {
    // ── User actions ─────────────────────────────────────────────────────────

    /// Submits a move after the local pre-check: the game must be active,
    /// it must be the local player's turn, and the target cell must be an
    /// in-bounds empty intersection.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveRejection`] when the pre-check fails; nothing is
    /// sent in that case.
    pub fn submit_move(&mut self, x: usize, y: usize) -> Result<(), MoveRejection> {
        let Some(session) = self.session.as_ref() else {
            return Err(MoveRejection::GameNotActive);
        };
        let Some(game) = self.game.as_ref() else {
            return Err(MoveRejection::GameNotActive);
        };

        let mv = Move { x, y };
        game.check_move(&session.user_id, mv)?;

        self.send(&ClientMessage::Move(MoveRequest {
            room_id: game.room_id(),
            x,
            y,
        }));
        Ok(())
    }

    /// Concedes the game.  Called by the shell after the user confirmed.
    /// The state machine does not act on the acknowledgment; the following
    /// GameOver naming the opponent as winner is the authoritative outcome.
    pub fn forfeit(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        self.send(&ClientMessage::Forfeit(ForfeitRequest {
            room_id: game.room_id(),
        }));
    }

    /// Returns from a finished game to the lobby, resetting to the Waiting
    /// state and re-triggering the same refresh cascade used after login.
    pub fn return_to_lobby(&mut self) {
        self.game = None;
        self.current_room = None;
        self.view = AppView::Lobby;
        if let Some(session) = self.session.as_ref() {
            let user_id = session.user_id.clone();
            self.refresh_cascade(&user_id);
        }
    }

    // ── Server event handlers ────────────────────────────────────────────────

    pub(crate) fn handle_game_start(&mut self, event: GameStart) {
        match GameSession::start(event) {
            Ok(game) => {
                info!(
                    "game started in room {} between {:?}",
                    game.room_id(),
                    game.players()
                );
                self.game = Some(game);
                self.view = AppView::Game;
            }
            Err(e) => warn!("unusable game start event: {e}"),
        }
    }

    pub(crate) fn handle_board_update(&mut self, update: BoardUpdate) {
        let Some(game) = self.game.as_mut() else {
            warn!("board update without a game in progress; dropping");
            return;
        };
        if let Err(e) = game.apply_board_update(update) {
            warn!("rejected board update: {e}");
        }
    }

    pub(crate) fn handle_game_over(&mut self, event: GameOverNotice) {
        let Some(game) = self.game.as_mut() else {
            warn!("game over without a game in progress; dropping");
            return;
        };
        game.finish(event);

        let outcome = self
            .session
            .as_ref()
            .and_then(|session| game.outcome_for(&session.user_id));
        match outcome {
            Some(GameOutcome::Won) => self.notify("You won!"),
            Some(GameOutcome::Lost) => self.notify("You lost!"),
            None => {}
        }
    }

    /// Only a failed move verdict is surfaced; success is redundant with
    /// the board broadcast that follows it.
    pub(crate) fn handle_move_resp(&mut self, resp: MoveResponse) {
        if resp.code != CODE_OK {
            self.notify(&resp.message);
        }
    }

    pub(crate) fn handle_forfeit_resp(&mut self, resp: ForfeitResponse) {
        // Acknowledgment only; the outcome arrives as GameOver.
        debug!("forfeit acknowledged with code {}", resp.code);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gomoku_core::protocol::messages::{LoginResponse, MessageType};
    use gomoku_core::{GameStatus, BOARD_SIZE};

    use super::*;
    use crate::application::context::{MessageSink, Notifier};
    use crate::infrastructure::network::RecordingSink;
    use crate::infrastructure::storage::credentials::MemoryCredentialStore;
    use crate::infrastructure::ui_bridge::RecordingNotifier;

    fn in_game_context(
        local: &str,
        first_player: &str,
    ) -> (ClientContext, Arc<RecordingSink>, Arc<RecordingNotifier>) {
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
            user_id: Some(local.to_string()),
        });
        ctx.handle_game_start(GameStart {
            room_id: 42,
            players: vec!["alice".to_string(), "bob".to_string()],
            first_player: first_player.to_string(),
        });
        sink.drain();
        (ctx, sink, notifier)
    }

    fn empty_grid() -> Vec<Vec<u8>> {
        vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE]
    }

    // ── Move submission ──────────────────────────────────────────────────────

    #[test]
    fn test_submit_move_on_local_turn_sends_request() {
        // Arrange
        let (mut ctx, sink, _) = in_game_context("alice", "alice");

        // Act
        ctx.submit_move(7, 7).unwrap();

        // Assert
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            ClientMessage::Move(req) => {
                assert_eq!((req.room_id, req.x, req.y), (42, 7, 7));
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_move_does_not_touch_local_board() {
        // Strict consistency: no optimistic placement.
        let (mut ctx, _, _) = in_game_context("alice", "alice");

        ctx.submit_move(7, 7).unwrap();

        assert_eq!(ctx.game().unwrap().board().stone_count(), 0);
        assert_eq!(ctx.game().unwrap().current_player(), "alice");
    }

    #[test]
    fn test_submit_move_out_of_turn_sends_nothing() {
        let (mut ctx, sink, _) = in_game_context("alice", "bob");

        let err = ctx.submit_move(7, 7).unwrap_err();

        assert_eq!(err, MoveRejection::NotYourTurn);
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_submit_move_without_game_is_rejected() {
        let sink = Arc::new(RecordingSink::default());
        let mut ctx = ClientContext::new(
            Arc::clone(&sink) as Arc<dyn MessageSink>,
            Arc::new(RecordingNotifier::default()),
            Arc::new(MemoryCredentialStore::default()),
        );

        assert_eq!(ctx.submit_move(0, 0), Err(MoveRejection::GameNotActive));
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_submit_move_onto_occupied_cell_is_rejected() {
        let (mut ctx, sink, _) = in_game_context("alice", "alice");
        let mut grid = empty_grid();
        grid[3][3] = 2;
        ctx.handle_board_update(BoardUpdate {
            board: grid,
            current_player: "alice".to_string(),
            last_x: Some(3),
            last_y: Some(3),
            last_player: Some("bob".to_string()),
        });

        let err = ctx.submit_move(3, 3).unwrap_err();

        assert_eq!(err, MoveRejection::CellOccupied { x: 3, y: 3 });
        assert!(sink.sent().is_empty());
    }

    // ── Board updates ────────────────────────────────────────────────────────

    #[test]
    fn test_board_update_replaces_state_and_turn() {
        let (mut ctx, _, _) = in_game_context("alice", "alice");
        let mut grid = empty_grid();
        grid[7][7] = 1;

        ctx.handle_board_update(BoardUpdate {
            board: grid,
            current_player: "bob".to_string(),
            last_x: Some(7),
            last_y: Some(7),
            last_player: Some("alice".to_string()),
        });

        let game = ctx.game().unwrap();
        assert_eq!(game.board().stone_count(), 1);
        assert_eq!(game.current_player(), "bob");
        assert_eq!(game.last_move(), Some(Move { x: 7, y: 7 }));
    }

    #[test]
    fn test_board_update_without_game_is_dropped() {
        let (mut ctx, _, _) = in_game_context("alice", "alice");
        ctx.return_to_lobby();

        // A stale broadcast arriving after the game was torn down.
        ctx.handle_board_update(BoardUpdate {
            board: empty_grid(),
            current_player: "bob".to_string(),
            last_x: None,
            last_y: None,
            last_player: None,
        });

        assert!(ctx.game().is_none());
    }

    // ── Game over and outcome framing ────────────────────────────────────────

    #[test]
    fn test_game_over_win_is_framed_for_local_user() {
        let (mut ctx, _, notifier) = in_game_context("alice", "alice");

        ctx.handle_game_over(GameOverNotice {
            winner: "alice".to_string(),
            win_line: None,
        });

        assert_eq!(ctx.game().unwrap().status(), GameStatus::Over);
        assert_eq!(notifier.messages(), vec!["You won!"]);
    }

    #[test]
    fn test_game_over_loss_is_framed_for_local_user() {
        let (mut ctx, _, notifier) = in_game_context("alice", "alice");

        ctx.handle_game_over(GameOverNotice {
            winner: "bob".to_string(),
            win_line: None,
        });

        assert_eq!(notifier.messages(), vec!["You lost!"]);
    }

    // ── Forfeit ──────────────────────────────────────────────────────────────

    #[test]
    fn test_forfeit_sends_request_but_does_not_end_game() {
        let (mut ctx, sink, _) = in_game_context("alice", "alice");

        ctx.forfeit();

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message_type(), MessageType::Forfeit);
        // Only the subsequent GameOver is authoritative.
        assert_eq!(ctx.game().unwrap().status(), GameStatus::Active);
    }

    #[test]
    fn test_forfeit_acknowledgment_changes_nothing() {
        let (mut ctx, _, notifier) = in_game_context("alice", "alice");

        ctx.handle_forfeit_resp(ForfeitResponse { code: CODE_OK });

        assert_eq!(ctx.game().unwrap().status(), GameStatus::Active);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_forfeit_without_game_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let mut ctx = ClientContext::new(
            Arc::clone(&sink) as Arc<dyn MessageSink>,
            Arc::new(RecordingNotifier::default()),
            Arc::new(MemoryCredentialStore::default()),
        );

        ctx.forfeit();

        assert!(sink.sent().is_empty());
    }

    // ── Return to lobby ──────────────────────────────────────────────────────

    #[test]
    fn test_return_to_lobby_resets_state_and_refreshes() {
        let (mut ctx, sink, _) = in_game_context("alice", "alice");
        ctx.handle_game_over(GameOverNotice {
            winner: "alice".to_string(),
            win_line: None,
        });
        sink.drain();

        // Act
        ctx.return_to_lobby();

        // Assert – back to Waiting: no game, no room, lobby view
        assert!(ctx.game().is_none());
        assert!(ctx.current_room().is_none());
        assert_eq!(ctx.view(), AppView::Lobby);

        // Assert – the same cascade as after login
        let types: Vec<MessageType> = sink.sent().iter().map(|m| m.message_type()).collect();
        assert_eq!(
            types,
            vec![
                MessageType::UserStats,
                MessageType::RoomList,
                MessageType::Leaderboard
            ]
        );
    }

    // ── Move verdicts ────────────────────────────────────────────────────────

    #[test]
    fn test_failed_move_verdict_is_surfaced() {
        let (mut ctx, _, notifier) = in_game_context("alice", "alice");

        ctx.handle_move_resp(MoveResponse {
            code: 400,
            message: "not your turn".to_string(),
        });

        assert_eq!(notifier.messages(), vec!["not your turn"]);
    }

    #[test]
    fn test_successful_move_verdict_is_silent() {
        let (mut ctx, _, notifier) = in_game_context("alice", "alice");

        ctx.handle_move_resp(MoveResponse {
            code: CODE_OK,
            message: String::new(),
        });

        assert!(notifier.messages().is_empty());
    }
}
