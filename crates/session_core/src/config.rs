//! Session configuration surface.

use chess::Color;

use crate::clock::TimeControl;
use crate::personality::Personality;

/// Everything decided before a session starts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Personality key of the automated opponent; `None` means a human
    /// opponent (hot-seat play, no orchestrator involvement).
    pub opponent: Option<String>,
    pub time_control: TimeControl,
    /// The color the (local) player takes.
    pub player_color: Color,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opponent: None,
            time_control: TimeControl::default(),
            player_color: Color::White,
        }
    }
}

impl SessionConfig {
    /// Resolve the configured opponent, falling back to the strongest
    /// personality for unknown keys.
    pub fn personality(&self) -> Option<&'static Personality> {
        self.opponent.as_deref().map(Personality::lookup)
    }
}
