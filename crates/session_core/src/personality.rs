//! Automated-opponent personalities.
//!
//! A personality is a named bundle of parameters controlling an automated
//! opponent's strength and perceived behavior. The table is closed; lookups
//! never fail and fall back to the strongest entry for unknown keys.

/// How an automated opponent picks its moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PersonalityKind {
    /// Uniformly random legal moves, no search collaborator involved.
    Random,
    /// Moves come from the external search collaborator.
    Engine {
        /// Target search depth in plies
        depth: u8,
        /// Base per-move time budget in milliseconds (untimed sessions)
        move_time_ms: u64,
        /// Probability of substituting the chosen move with a random one
        blunder_chance: f64,
    },
}

/// A named opponent profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    /// Stable lookup key
    pub key: &'static str,
    /// Human-readable name for the presentation layer
    pub display_name: &'static str,
    pub kind: PersonalityKind,
    /// Cosmetic think-delay window `[min, max]` in milliseconds.
    ///
    /// Purely presentational; never part of the legal time budget.
    pub think_delay_ms: (u64, u64),
}

/// Default fallback entry, also the strongest (last) table row.
const STRONGEST: Personality = Personality {
    key: "master",
    display_name: "Master",
    kind: PersonalityKind::Engine {
        depth: 14,
        move_time_ms: 2_500,
        blunder_chance: 0.0,
    },
    think_delay_ms: (250, 800),
};

/// The closed personality table, weakest first.
static PERSONALITIES: &[Personality] = &[
    Personality {
        key: "scatter",
        display_name: "Scatter",
        kind: PersonalityKind::Random,
        think_delay_ms: (300, 900),
    },
    Personality {
        key: "casual",
        display_name: "Casual",
        kind: PersonalityKind::Engine {
            depth: 4,
            move_time_ms: 600,
            blunder_chance: 0.25,
        },
        think_delay_ms: (500, 1_500),
    },
    Personality {
        key: "club",
        display_name: "Club",
        kind: PersonalityKind::Engine {
            depth: 8,
            move_time_ms: 1_200,
            blunder_chance: 0.08,
        },
        think_delay_ms: (400, 1_200),
    },
    STRONGEST,
];

impl Personality {
    /// Look up a personality by key.
    ///
    /// Total: unknown keys map to the strongest personality.
    pub fn lookup(key: &str) -> &'static Personality {
        PERSONALITIES
            .iter()
            .find(|p| p.key == key)
            .unwrap_or_else(Personality::strongest)
    }

    /// The default fallback entry (last in the table).
    pub fn strongest() -> &'static Personality {
        &STRONGEST
    }

    /// All known personalities, weakest first.
    pub fn all() -> impl Iterator<Item = &'static Personality> {
        PERSONALITIES.iter()
    }

    pub fn is_random(&self) -> bool {
        matches!(self.kind, PersonalityKind::Random)
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

#[cfg(test)]
#[path = "personality_tests.rs"]
mod personality_tests;
