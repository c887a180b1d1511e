//! Countdown clocks and time-control parsing.
//!
//! A session owns one [`ChessClock`] with a countdown per side. At most one
//! side is running at any instant, and it always matches the side to move.
//! The clock does not observe wall time by itself: the runtime feeds it fixed
//! 1 Hz ticks, which keeps expiry handling inside the session's single
//! serialization point.

use std::str::FromStr;
use std::time::Duration;

use chess::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds removed from the running side per tick.
pub const TICK_MS: u64 = 1_000;

/// Time control settings, expressed as `"<minutes>+<incrementSeconds>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Initial time in seconds (0 = untimed)
    pub initial_time: u64,
    /// Increment per move in seconds
    pub increment: u64,
}

/// Error returned when a time-control string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time control {0:?}, expected \"<minutes>+<incrementSeconds>\"")]
pub struct TimeControlParseError(pub String);

impl TimeControl {
    pub fn new(minutes: u64, increment_secs: u64) -> Self {
        Self {
            initial_time: minutes * 60,
            increment: increment_secs,
        }
    }

    /// Unlimited time
    pub fn unlimited() -> Self {
        Self {
            initial_time: 0,
            increment: 0,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.initial_time == 0
    }
}

impl FromStr for TimeControl {
    type Err = TimeControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minutes, increment) = s
            .split_once('+')
            .ok_or_else(|| TimeControlParseError(s.to_string()))?;
        let minutes: u64 = minutes
            .trim()
            .parse()
            .map_err(|_| TimeControlParseError(s.to_string()))?;
        let increment: u64 = increment
            .trim()
            .parse()
            .map_err(|_| TimeControlParseError(s.to_string()))?;
        Ok(Self::new(minutes, increment))
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(10, 5) // Rapid 10+5
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unlimited() {
            write!(f, "Unlimited")
        } else {
            write!(f, "{}+{}", self.initial_time / 60, self.increment)
        }
    }
}

/// Chess clock for both players.
///
/// Untimed sessions keep `enabled == false`: their clocks never tick and
/// never expire.
#[derive(Debug, Clone)]
pub struct ChessClock {
    /// Time control settings
    pub time_control: TimeControl,
    /// White's remaining time in milliseconds
    white_ms: u64,
    /// Black's remaining time in milliseconds
    black_ms: u64,
    /// Which side's clock is counting down
    running: Option<Color>,
    /// Is the clock enabled?
    enabled: bool,
}

impl Default for ChessClock {
    fn default() -> Self {
        Self::new(TimeControl::default())
    }
}

impl ChessClock {
    pub fn new(time_control: TimeControl) -> Self {
        let initial_ms = time_control.initial_time * 1000;
        Self {
            time_control,
            white_ms: initial_ms,
            black_ms: initial_ms,
            running: None,
            enabled: !time_control.is_unlimited(),
        }
    }

    /// Start the countdown for one side, implicitly stopping the other.
    pub fn start(&mut self, color: Color) {
        if self.enabled {
            self.running = Some(color);
        }
    }

    /// Stop both countdowns.
    pub fn stop(&mut self) {
        self.running = None;
    }

    /// Which side is currently counting down, if any.
    pub fn running_for(&self) -> Option<Color> {
        self.running
    }

    /// Advance the running side by one tick.
    ///
    /// Returns the side that ran out of time, if any. Expiry stops both
    /// clocks; the caller latches game-over for the opposite side.
    pub fn tick(&mut self) -> Option<Color> {
        let color = self.running?;
        let remaining = match color {
            Color::White => &mut self.white_ms,
            Color::Black => &mut self.black_ms,
        };
        *remaining = remaining.saturating_sub(TICK_MS);
        if *remaining == 0 {
            self.running = None;
            return Some(color);
        }
        None
    }

    /// Add the per-move increment to the side that just moved.
    ///
    /// Called at the moment a move is applied, not when the mover's clock
    /// stops (standard increment semantics).
    pub fn add_increment(&mut self, color: Color) {
        if !self.enabled || self.time_control.increment == 0 {
            return;
        }
        let bonus = self.time_control.increment * 1000;
        match color {
            Color::White => self.white_ms += bonus,
            Color::Black => self.black_ms += bonus,
        }
    }

    /// Remaining time for one side; `None` for untimed sessions.
    pub fn remaining_ms(&self, color: Color) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        Some(match color {
            Color::White => self.white_ms,
            Color::Black => self.black_ms,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Format time as MM:SS (tenths shown under ten seconds)
    pub fn format_time(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;

        if duration.as_millis() < 10_000 {
            let tenths = (duration.as_millis() % 1000) / 100;
            format!("{}:{:02}.{}", mins, secs, tenths)
        } else {
            format!("{}:{:02}", mins, secs)
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
