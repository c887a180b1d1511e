//! Premove queue.
//!
//! Holds at most one pending move, set by the human while the opponent is
//! still to move. The queue never judges legality; the move is submitted to
//! the rules engine exactly once when the owner's turn arrives, and the slot
//! is cleared regardless of the outcome.

use chess::{Board, Color, Piece, Square};
use log::debug;

/// A queued move candidate, validated lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Premove {
    pub from: Square,
    pub to: Square,
    /// Explicit promotion choice; `None` lets execution default to a queen
    /// when the moving piece turns out to be a promoting pawn.
    pub promotion: Option<Piece>,
}

/// What a premove click accomplished, for presentation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremoveClick {
    /// A source square was selected
    Selected(Square),
    /// A premove was queued
    Queued(Premove),
    /// Selection (and any queued premove) was cleared
    Cleared,
    /// Click changed nothing
    Ignored,
}

/// One-slot premove queue with two-click selection.
#[derive(Debug, Clone, Default)]
pub struct PremoveQueue {
    selection: Option<Square>,
    queued: Option<Premove>,
}

impl PremoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a square click made while it is not the owner's turn.
    ///
    /// First click selects a square holding one of the owner's pieces; a
    /// second click on a different square queues the premove. Re-clicking
    /// the source, or clicking an empty/opponent square with nothing
    /// selected, clears the pending state.
    pub fn click(&mut self, board: &Board, owner: Color, square: Square) -> PremoveClick {
        if let Some(from) = self.selection {
            if from == square {
                self.clear();
                return PremoveClick::Cleared;
            }
            let premove = Premove {
                from,
                to: square,
                promotion: None,
            };
            self.selection = None;
            self.queued = Some(premove);
            debug!("premove queued: {}{}", premove.from, premove.to);
            return PremoveClick::Queued(premove);
        }

        if board.color_on(square) == Some(owner) {
            self.selection = Some(square);
            return PremoveClick::Selected(square);
        }

        if self.queued.take().is_some() {
            return PremoveClick::Cleared;
        }
        PremoveClick::Ignored
    }

    /// Queue a premove directly (drag-and-drop style input).
    pub fn set(&mut self, premove: Premove) {
        self.selection = None;
        self.queued = Some(premove);
    }

    /// Take the queued premove, emptying the slot unconditionally.
    ///
    /// A premove is a single-shot bet: the caller attempts it once and never
    /// puts it back.
    pub fn take(&mut self) -> Option<Premove> {
        self.selection = None;
        self.queued.take()
    }

    pub fn queued(&self) -> Option<Premove> {
        self.queued
    }

    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    pub fn clear(&mut self) {
        self.selection = None;
        self.queued = None;
    }
}

#[cfg(test)]
#[path = "premove_tests.rs"]
mod premove_tests;
