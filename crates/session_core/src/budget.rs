//! Per-move search time allocation.
//!
//! Pure arithmetic over the depleting clock: given remaining time, increment,
//! and the current move number, decide how long the search collaborator may
//! think and how deep it may go. The allocation must always leave the clock
//! strictly above zero; flagging because of our own think time is never
//! acceptable.

use std::time::Duration;

/// Remaining time below which the calculator stops optimizing and just
/// avoids the flag.
pub const EMERGENCY_THRESHOLD_MS: u64 = 5_000;

/// Headroom kept between the allocated budget and the actual clock.
pub const SAFETY_MARGIN_MS: u64 = 100;

/// Depth used while in emergency mode.
pub const EMERGENCY_DEPTH: u8 = 2;

/// Smallest non-emergency allocation.
const MIN_ALLOCATION_MS: u64 = 100;

/// Moves-remaining heuristic: `max(MOVES_FLOOR, MOVES_HORIZON - move_number)`.
const MOVES_HORIZON: u32 = 40;
const MOVES_FLOOR: u32 = 12;

/// Fraction of the increment folded into the budget (conservative: the full
/// increment only arrives after the move is actually made).
const INCREMENT_NUMERATOR: u64 = 6;
const INCREMENT_DENOMINATOR: u64 = 10;

/// Clock data for the side about to think.
#[derive(Debug, Clone, Copy)]
pub struct ClockSnapshot {
    /// Remaining time in milliseconds
    pub remaining_ms: u64,
    /// Increment per move in milliseconds
    pub increment_ms: u64,
}

/// The outcome of a budget calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Wall-time allowance for the search
    pub time: Duration,
    /// Depth cap, secondary bound alongside the time bound
    pub depth: u8,
    /// True when the allocation came from emergency mode
    pub emergency: bool,
}

/// Time regimes classified by remaining clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    Bullet,
    Blitz,
    Classical,
}

impl Regime {
    fn classify(remaining_ms: u64) -> Self {
        if remaining_ms < 60_000 {
            Regime::Bullet
        } else if remaining_ms < 300_000 {
            Regime::Blitz
        } else {
            Regime::Classical
        }
    }

    /// Scale the moves-remaining estimate into a divisor. Bullet stretches
    /// the estimate (spend less per move), classical compresses it.
    fn divisor(self, estimated_moves: u64) -> u64 {
        match self {
            Regime::Bullet => estimated_moves * 3 / 2,
            Regime::Blitz => estimated_moves,
            Regime::Classical => (estimated_moves * 3 / 4).max(1),
        }
    }
}

/// Compute the search budget for one think.
///
/// `max_depth` is the personality's target depth; the time-derived cap never
/// exceeds it. `move_number` counts full moves from 1.
pub fn compute_budget(clock: ClockSnapshot, move_number: u32, max_depth: u8) -> SearchBudget {
    let remaining = clock.remaining_ms;

    // Emergency mode overrides all other logic.
    if remaining < EMERGENCY_THRESHOLD_MS {
        let time_ms = remaining.saturating_sub(SAFETY_MARGIN_MS).max(remaining / 2);
        return SearchBudget {
            time: Duration::from_millis(time_ms),
            depth: EMERGENCY_DEPTH.min(max_depth),
            emergency: true,
        };
    }

    let estimated_moves = u64::from(MOVES_HORIZON.saturating_sub(move_number).max(MOVES_FLOOR));
    let divisor = Regime::classify(remaining).divisor(estimated_moves);
    let mut allocated = (remaining / divisor).max(MIN_ALLOCATION_MS);

    allocated += clock.increment_ms * INCREMENT_NUMERATOR / INCREMENT_DENOMINATOR;

    // Never allow the allocation to reach the flag.
    allocated = allocated.min(remaining - SAFETY_MARGIN_MS);

    SearchBudget {
        time: Duration::from_millis(allocated),
        depth: depth_for_allocation(allocated).min(max_depth),
        emergency: false,
    }
}

/// Fixed breakpoints mapping allocated time to a depth cap.
fn depth_for_allocation(allocated_ms: u64) -> u8 {
    match allocated_ms {
        0..=249 => 3,
        250..=999 => 4,
        1_000..=2_999 => 6,
        3_000..=7_999 => 8,
        _ => 10,
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod budget_tests;
