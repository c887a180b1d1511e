//! AI think-cycle orchestration.
//!
//! Each think cycle runs the personality's cosmetic delay and the actual
//! search concurrently and resolves only when both are done, so perceived
//! latency is never shorter than the configured delay window. Search failures
//! degrade in steps: one reduced-effort retry, then a uniformly random legal
//! move. If the search collaborator never becomes ready, the personality is
//! demoted to random play for the remainder of the session.

use std::time::Duration;

use chess::{Board, ChessMove, MoveGen};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::time::sleep;

use crate::budget::{compute_budget, ClockSnapshot};
use crate::personality::{Personality, PersonalityKind};
use crate::search::{start_engine, EngineHandle, EngineSpawner, SearchError, SearchLimits};
use crate::session::uci;

/// How long the search collaborator gets to signal readiness.
pub const READY_DEADLINE: Duration = Duration::from_secs(5);

/// Depth floor for the single reduced-effort retry.
const RETRY_MIN_DEPTH: u8 = 2;

/// Everything a think cycle needs, snapshotted at scheduling time.
#[derive(Debug, Clone)]
pub struct ThinkTicket {
    /// Staleness token; outcomes carrying an old epoch are discarded.
    pub epoch: u64,
    pub board: Board,
    /// Clock data for the thinking side; `None` for untimed play.
    pub clock: Option<ClockSnapshot>,
    /// Full-move number, for the moves-remaining heuristic.
    pub move_number: u32,
}

/// Resolution of a think cycle.
#[derive(Debug, Clone)]
pub struct ThinkOutcome {
    pub epoch: u64,
    /// `None` only when the position had no legal moves (defensive guard).
    pub mv: Option<ChessMove>,
}

/// Drives think cycles for one automated opponent.
///
/// The search-collaborator resource is created lazily on first use, reused
/// across cycles, and released on [`AiOrchestrator::reset`].
pub struct AiOrchestrator {
    personality: &'static Personality,
    spawner: Box<dyn EngineSpawner>,
    engine: Option<EngineHandle>,
    demoted: bool,
    ready_deadline: Duration,
}

impl AiOrchestrator {
    pub fn new(personality: &'static Personality, spawner: Box<dyn EngineSpawner>) -> Self {
        Self {
            personality,
            spawner,
            engine: None,
            demoted: false,
            ready_deadline: READY_DEADLINE,
        }
    }

    /// Override the readiness deadline (tests).
    pub fn with_ready_deadline(mut self, deadline: Duration) -> Self {
        self.ready_deadline = deadline;
        self
    }

    pub fn personality(&self) -> &'static Personality {
        self.personality
    }

    /// True once the session has fallen back to random play.
    pub fn is_demoted(&self) -> bool {
        self.demoted
    }

    /// Run one think cycle to completion.
    ///
    /// Cancellation is cooperative: the caller discards outcomes whose epoch
    /// is stale; nothing here mutates session state.
    pub async fn think(&mut self, ticket: ThinkTicket) -> ThinkOutcome {
        let legal: Vec<ChessMove> = MoveGen::new_legal(&ticket.board).collect();
        if legal.is_empty() {
            warn!("think requested with no legal moves; ignoring");
            return ThinkOutcome {
                epoch: ticket.epoch,
                mv: None,
            };
        }

        let delay = sample_delay(self.personality.think_delay_ms, &mut rand::thread_rng());

        let mv = match self.personality.kind {
            PersonalityKind::Random => {
                sleep(delay).await;
                random_move(&legal, &mut rand::thread_rng())
            }
            PersonalityKind::Engine {
                depth,
                move_time_ms,
                blunder_chance,
            } => {
                if self.demoted {
                    sleep(delay).await;
                    random_move(&legal, &mut rand::thread_rng())
                } else {
                    self.engine_think(&ticket, &legal, delay, depth, move_time_ms, blunder_chance)
                        .await
                }
            }
        };

        ThinkOutcome {
            epoch: ticket.epoch,
            mv,
        }
    }

    /// Release the search resource and forget the demotion; called on
    /// session reset (a new session starts from a clean slate).
    pub async fn reset(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.release().await;
        }
        self.demoted = false;
    }

    async fn engine_think(
        &mut self,
        ticket: &ThinkTicket,
        legal: &[ChessMove],
        delay: Duration,
        depth: u8,
        move_time_ms: u64,
        blunder_chance: f64,
    ) -> Option<ChessMove> {
        let engine = match self.ensure_engine().await {
            Ok(engine) => engine,
            Err(err) => {
                warn!(
                    "demoting {} to random play for this session: {}",
                    self.personality.key, err
                );
                self.demoted = true;
                sleep(delay).await;
                return random_move(legal, &mut rand::thread_rng());
            }
        };

        let limits = match ticket.clock {
            Some(clock) => {
                let budget = compute_budget(clock, ticket.move_number, depth);
                if budget.emergency {
                    debug!("emergency time budget: {:?}", budget.time);
                }
                SearchLimits::depth_and_time(budget.depth, budget.time)
            }
            None => SearchLimits::depth_and_time(depth, Duration::from_millis(move_time_ms)),
        };

        let fen = ticket.board.to_string();
        let (_, reply) = tokio::join!(sleep(delay), search_with_retry(&engine, &fen, limits));

        let candidate = match reply.and_then(|text| match_legal(legal, &text)) {
            Some(mv) => mv,
            None => {
                warn!("search produced no usable move, playing a random one");
                random_move(legal, &mut rand::thread_rng())?
            }
        };

        let chosen = if blunder_chance > 0.0 && rand::thread_rng().gen_bool(blunder_chance) {
            let substituted = blunder_substitute(candidate, legal, &mut rand::thread_rng());
            debug!("blunder: {} -> {}", uci(candidate), uci(substituted));
            substituted
        } else {
            candidate
        };

        Some(chosen)
    }

    async fn ensure_engine(&mut self) -> Result<EngineHandle, SearchError> {
        if let Some(engine) = &self.engine {
            return Ok(engine.clone());
        }
        let backend = self.spawner.spawn_backend();
        let engine = start_engine(backend, self.ready_deadline).await?;
        info!("search collaborator ready");
        self.engine = Some(engine.clone());
        Ok(engine)
    }
}

/// One search attempt plus exactly one reduced-effort retry.
async fn search_with_retry(
    engine: &EngineHandle,
    fen: &str,
    limits: SearchLimits,
) -> Option<String> {
    match engine.best_move(fen, limits).await {
        Ok(text) => Some(text),
        Err(err) => {
            warn!("search failed ({}), retrying shallower", err);
            let retry = SearchLimits {
                depth: (limits.depth / 2).max(RETRY_MIN_DEPTH),
                move_time: limits.move_time.map(|t| t * 5 / 4),
            };
            match engine.best_move(fen, retry).await {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!("search retry failed: {}", err);
                    None
                }
            }
        }
    }
}

/// Match a coordinate-form reply against the legal move list.
fn match_legal(legal: &[ChessMove], text: &str) -> Option<ChessMove> {
    let text = text.trim().to_lowercase();
    legal.iter().copied().find(|m| uci(*m) == text)
}

/// Uniform random legal move.
pub fn random_move<R: Rng + ?Sized>(legal: &[ChessMove], rng: &mut R) -> Option<ChessMove> {
    legal.choose(rng).copied()
}

/// Replace a candidate with a uniformly chosen *different* legal move.
///
/// Moves are compared by coordinate form. When no alternative exists the
/// candidate is kept.
pub fn blunder_substitute<R: Rng + ?Sized>(
    candidate: ChessMove,
    legal: &[ChessMove],
    rng: &mut R,
) -> ChessMove {
    let candidate_uci = uci(candidate);
    let alternatives: Vec<ChessMove> = legal
        .iter()
        .copied()
        .filter(|m| uci(*m) != candidate_uci)
        .collect();
    alternatives.choose(rng).copied().unwrap_or(candidate)
}

/// Sample the cosmetic think delay from the personality window.
pub fn sample_delay<R: Rng + ?Sized>(window_ms: (u64, u64), rng: &mut R) -> Duration {
    let (min, max) = window_ms;
    if max <= min {
        Duration::from_millis(min)
    } else {
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
