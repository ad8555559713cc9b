//! Session manager: authentication state and its lifecycle.
//!
//! Login and registration are plain request/response exchanges; the only
//! local intelligence is input validation before anything touches the wire,
//! and the refresh cascade fired once a session exists.  Token re-auth uses
//! the same LOGIN message with a `{token}` payload, so the response handler
//! is shared between both forms.

use thiserror::Error;
use tracing::{info, warn};

use gomoku_core::protocol::messages::{
    ClientMessage, LeaderboardResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UserStatsResponse, CODE_OK,
};

use crate::application::context::{AppView, ClientContext, Session};

/// Malformed local input, caught before a request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username and password must not be empty")]
    EmptyCredentials,
}

impl ClientContext {
    // ── User actions ─────────────────────────────────────────────────────────

    /// Interactive login.  Empty credentials are surfaced via the notifier
    /// and never reach the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when validation fails.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), ValidationError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.notify("Please enter a username and password");
            return Err(ValidationError::EmptyCredentials);
        }

        self.send(&ClientMessage::Login(LoginRequest::with_password(
            username, password,
        )));
        Ok(())
    }

    /// Silent re-authentication with a persisted token, attempted
    /// immediately after the channel opens.
    pub fn login_with_token(&mut self, token: &str) {
        self.send(&ClientMessage::Login(LoginRequest::with_token(token)));
    }

    /// Account registration.  Success does not log in; the user is returned
    /// to the login entry point.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when validation fails.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), ValidationError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.notify("Please enter a username and password");
            return Err(ValidationError::EmptyCredentials);
        }

        self.send(&ClientMessage::Register(RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }));
        Ok(())
    }

    /// Clears the persisted token and the session, returning to the
    /// unauthenticated state.
    pub fn logout(&mut self) {
        if let Err(e) = self.credentials().clear() {
            warn!("failed to clear persisted token: {e}");
        }
        self.session = None;
        self.view = AppView::Auth;
    }

    // ── Server response handlers ─────────────────────────────────────────────

    pub(crate) fn handle_login_resp(&mut self, resp: LoginResponse) {
        if resp.code != CODE_OK {
            self.notify(&resp.message);
            return;
        }

        let (Some(user_id), Some(token)) = (resp.user_id, resp.token) else {
            warn!("login response code {CODE_OK} without user_id/token; ignoring");
            return;
        };

        if let Err(e) = self.credentials().store(&token) {
            // A session still exists for this connection; only persistence
            // across restarts is lost.
            warn!("failed to persist token: {e}");
        }

        info!("logged in as {user_id}");
        self.session = Some(Session {
            user_id: user_id.clone(),
            token,
        });
        self.view = AppView::Lobby;
        self.refresh_cascade(&user_id);
    }

    pub(crate) fn handle_register_resp(&mut self, resp: RegisterResponse) {
        if resp.code == CODE_OK {
            self.notify("Registration successful, please log in");
            self.view = AppView::Auth;
        } else {
            self.notify(&resp.message);
        }
    }

    pub(crate) fn handle_user_stats_resp(&mut self, resp: UserStatsResponse) {
        if resp.code == CODE_OK {
            self.score = Some(resp.score);
        }
    }

    pub(crate) fn handle_leaderboard_resp(&mut self, resp: LeaderboardResponse) {
        self.leaderboard = resp.ranks;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
