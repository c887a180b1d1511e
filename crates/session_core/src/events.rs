//! Events emitted toward the presentation layer.
//!
//! The core never draws anything; it publishes serializable facts and lets
//! the renderer decide what to do with them.

use serde::Serialize;

/// Outbound session event.
///
/// Squares and moves are carried in coordinate text form so the consumer
/// needs no chess types of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A move was applied to the position.
    MoveApplied {
        from: String,
        to: String,
        san: String,
        fen: String,
    },
    /// Human-readable phase change: whose turn, check, thinking, game over.
    StatusChanged { status: String },
    /// Per-side remaining time; `None` for untimed play.
    ClockTick {
        white_ms: Option<u64>,
        black_ms: Option<u64>,
    },
    /// Square selection changed (legal-target hints for the renderer).
    SelectionChanged {
        selected: Option<String>,
        targets: Vec<String>,
    },
    /// A premove was queued.
    PremoveQueued { from: String, to: String },
    /// The queued premove (or pending premove selection) went away.
    PremoveCleared,
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
