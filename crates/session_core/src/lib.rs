//! Orchestration core for timed human-vs-engine chess sessions.
//!
//! The hard part handled here is coordination, not chess: scheduling when the
//! automated opponent may think and for how long, budgeting think time
//! against a depleting clock, queueing a premove while the opponent is still
//! thinking, keeping two countdown clocks in lock-step with turn ownership,
//! and degrading gracefully when the search collaborator is slow, absent, or
//! failing. Move legality belongs to the rules engine (the `chess` crate);
//! the search algorithm lives behind the [`search::SearchBackend`] interface.

pub mod budget;
pub mod clock;
pub mod config;
pub mod events;
pub mod machine;
pub mod orchestrator;
pub mod personality;
pub mod premove;
pub mod runtime;
pub mod search;
pub mod session;

pub use budget::{compute_budget, ClockSnapshot, SearchBudget};
pub use clock::{ChessClock, TimeControl, TimeControlParseError};
pub use config::SessionConfig;
pub use events::SessionEvent;
pub use machine::{Input, Output, Phase, SessionMachine};
pub use orchestrator::{AiOrchestrator, ThinkOutcome, ThinkTicket};
pub use personality::{Personality, PersonalityKind};
pub use premove::{Premove, PremoveQueue};
pub use runtime::{spawn_session, Command, SessionHandle};
pub use search::{EngineHandle, EngineSpawner, SearchBackend, SearchError, SearchLimits};
pub use session::{uci, GameOver, GameSession, MoveRecord};
