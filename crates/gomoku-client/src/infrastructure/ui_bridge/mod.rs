//! UI bridge: the contracts a front end plugs into.
//!
//! The runtime never paints anything itself.  A front end supplies a
//! [`BoardRenderer`] and a [`Notifier`](crate::application::context::Notifier);
//! the bridge hands them pure data: the board matrix plus a legal-move
//! predicate in one direction, pointer coordinates mapped to board cells in
//! the other.  The grid geometry constants match the reference front end's
//! canvas layout, so the two agree on what a click means.

use std::sync::Mutex;

use tracing::info;

use gomoku_core::{Board, Move, BOARD_SIZE};

use crate::application::context::{ClientContext, Notifier};

// ── Board geometry ────────────────────────────────────────────────────────────

/// Pixel distance between adjacent grid lines.
pub const CELL_SIZE_PX: f64 = 36.0;

/// Pixel inset of the first grid line from the drawing surface edge.
pub const PADDING_PX: f64 = 21.0;

/// Maps a pointer position (relative to the drawing surface) to the nearest
/// board cell, or `None` when the position is outside the grid.
pub fn cell_at_pixel(px: f64, py: f64) -> Option<Move> {
    let x = ((px - PADDING_PX) / CELL_SIZE_PX).round() as i64;
    let y = ((py - PADDING_PX) / CELL_SIZE_PX).round() as i64;

    if (0..BOARD_SIZE as i64).contains(&x) && (0..BOARD_SIZE as i64).contains(&y) {
        Some(Move {
            x: x as usize,
            y: y as usize,
        })
    } else {
        None
    }
}

// ── Renderer contract ─────────────────────────────────────────────────────────

/// Paints the board.  Implemented by the front end; consumed as a pure
/// function of the board matrix and a legal-move predicate.
pub trait BoardRenderer {
    fn render(&self, board: &Board, legal_move: &dyn Fn(Move) -> bool);
}

/// Renders the current game, if any, through the supplied renderer.
///
/// The legal-move predicate closes over the live game state, so the front
/// end can e.g. show a hover cursor only where a move would actually be
/// submitted.
pub fn paint(ctx: &ClientContext, renderer: &dyn BoardRenderer) {
    let (Some(session), Some(game)) = (ctx.session(), ctx.game()) else {
        return;
    };
    let local = session.user_id.clone();
    let legal = move |mv: Move| game.check_move(&local, mv).is_ok();
    renderer.render(game.board(), &legal);
}

/// Routes a pointer click on the drawing surface into a move submission.
///
/// Clicks outside the grid, and clicks that fail the local pre-check, are
/// silently ignored; the reference front end behaves the same way.
pub fn handle_board_click(ctx: &mut ClientContext, px: f64, py: f64) {
    if let Some(mv) = cell_at_pixel(px, py) {
        let _ = ctx.submit_move(mv.x, mv.y);
    }
}

// ── Notifier implementations ──────────────────────────────────────────────────

/// Notifier for headless operation: blocking messages become log lines.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn blocking_message(&self, text: &str) {
        info!(target: "user_notice", "{text}");
    }
}

/// Recording notifier for tests.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Every message surfaced so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// The message the user would currently see (latest overwrites).
    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn blocking_message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
