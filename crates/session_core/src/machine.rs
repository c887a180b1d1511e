//! Turn-taking state machine.
//!
//! Every piece of shared session state — position, clocks, premove slot,
//! game-over latch — is mutated in exactly one place: [`SessionMachine::handle`].
//! User intents, clock ticks, and resolved think cycles all arrive here as
//! [`Input`] values; anything the outside world must do in response leaves as
//! [`Output`] values. Suspension points (delays, search round-trips, ticks)
//! therefore never touch state directly, and every resumption is re-validated
//! against the current phase and think epoch before it can act.

use chess::{Color, Piece, Square};
use log::{debug, warn};

use crate::clock::ChessClock;
use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::orchestrator::{ThinkOutcome, ThinkTicket};
use crate::budget::ClockSnapshot;
use crate::personality::Personality;
use crate::premove::{Premove, PremoveClick, PremoveQueue};
use crate::session::{GameOver, GameSession};

/// Session lifecycle phase. `GameOver` is terminal until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    PlayerTurn,
    OpponentTurn,
    GameOver(GameOver),
}

/// Everything the machine can react to.
#[derive(Debug)]
pub enum Input {
    Start,
    SelectSquare(Square),
    AttemptMove {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
    Resign,
    Reset,
    ClockTick,
    ThinkResolved(ThinkOutcome),
}

/// Everything the machine asks the outside world to do.
#[derive(Debug)]
pub enum Output {
    Event(SessionEvent),
    /// Start a think cycle for the automated opponent.
    Think(ThinkTicket),
    /// Discard the search-collaborator resource (session reset).
    ReleaseEngine,
}

/// The top-level coordinator.
pub struct SessionMachine {
    config: SessionConfig,
    personality: Option<&'static Personality>,
    session: GameSession,
    clock: ChessClock,
    premove: PremoveQueue,
    phase: Phase,
    /// Square currently selected for direct move input
    selected: Option<Square>,
    /// Staleness token for think cycles; bumped whenever an in-flight cycle
    /// must be ignored (new think, resign, reset, time forfeit).
    think_epoch: u64,
    /// At most one think cycle in flight
    thinking: bool,
}

impl SessionMachine {
    pub fn new(config: SessionConfig) -> Self {
        let personality = config.personality();
        let clock = ChessClock::new(config.time_control);
        Self {
            config,
            personality,
            session: GameSession::new(),
            clock,
            premove: PremoveQueue::new(),
            phase: Phase::NotStarted,
            selected: None,
            think_epoch: 0,
            thinking: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn clock(&self) -> &ChessClock {
        &self.clock
    }

    pub fn premove(&self) -> &PremoveQueue {
        &self.premove
    }

    pub fn personality(&self) -> Option<&'static Personality> {
        self.personality
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Process one input; the single serialization point for all mutation.
    pub fn handle(&mut self, input: Input) -> Vec<Output> {
        let mut out = Vec::new();
        match input {
            Input::Start => self.start(&mut out),
            Input::SelectSquare(square) => self.select_square(square, &mut out),
            Input::AttemptMove {
                from,
                to,
                promotion,
            } => self.attempt_move(from, to, promotion, &mut out),
            Input::Resign => self.resign(&mut out),
            Input::Reset => self.reset(&mut out),
            Input::ClockTick => self.clock_tick(&mut out),
            Input::ThinkResolved(outcome) => self.think_resolved(outcome, &mut out),
        }
        out
    }

    fn start(&mut self, out: &mut Vec<Output>) {
        if self.phase != Phase::NotStarted {
            return;
        }
        let to_move = self.session.side_to_move();
        self.phase = self.turn_phase(to_move);
        self.clock.start(to_move);
        self.push_status(out);
        if self.phase == Phase::OpponentTurn {
            self.schedule_think(out);
        }
    }

    /// Phase for a given side to move.
    fn turn_phase(&self, to_move: Color) -> Phase {
        if to_move == self.config.player_color {
            Phase::PlayerTurn
        } else {
            Phase::OpponentTurn
        }
    }

    /// True when square clicks should move pieces directly rather than queue
    /// a premove: the player's own turn, or any turn in hot-seat play.
    fn direct_input(&self) -> bool {
        match self.phase {
            Phase::PlayerTurn => true,
            Phase::OpponentTurn => self.personality.is_none(),
            _ => false,
        }
    }

    fn select_square(&mut self, square: Square, out: &mut Vec<Output>) {
        if self.direct_input() {
            self.select_for_move(square, out);
        } else if self.phase == Phase::OpponentTurn {
            self.select_for_premove(square, out);
        }
    }

    /// Direct input: first click selects an own-colored piece, second click
    /// on a legal target plays the move (promotions default to queen).
    fn select_for_move(&mut self, square: Square, out: &mut Vec<Output>) {
        let board = self.session.board();
        let to_move = self.session.side_to_move();

        if board.color_on(square) == Some(to_move) {
            self.selected = Some(square);
            let targets = self.session.legal_targets(square);
            out.push(Output::Event(SessionEvent::SelectionChanged {
                selected: Some(square.to_string()),
                targets: targets.iter().map(|s| s.to_string()).collect(),
            }));
            return;
        }

        if let Some(from) = self.selected.take() {
            if let Some(mv) = self.session.find_move(from, square, None) {
                self.apply_move(mv, out);
            } else {
                debug!("no legal move {}{}", from, square);
            }
        }
        out.push(Output::Event(SessionEvent::SelectionChanged {
            selected: None,
            targets: Vec::new(),
        }));
    }

    fn select_for_premove(&mut self, square: Square, out: &mut Vec<Output>) {
        let board = self.session.board();
        match self
            .premove
            .click(&board, self.config.player_color, square)
        {
            PremoveClick::Selected(sq) => {
                out.push(Output::Event(SessionEvent::SelectionChanged {
                    selected: Some(sq.to_string()),
                    targets: Vec::new(),
                }));
            }
            PremoveClick::Queued(pm) => {
                out.push(Output::Event(SessionEvent::PremoveQueued {
                    from: pm.from.to_string(),
                    to: pm.to.to_string(),
                }));
            }
            PremoveClick::Cleared => {
                out.push(Output::Event(SessionEvent::PremoveCleared));
            }
            PremoveClick::Ignored => {}
        }
    }

    fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        out: &mut Vec<Output>,
    ) {
        if self.direct_input() {
            match self.session.find_move(from, to, promotion) {
                Some(mv) => {
                    self.apply_move(mv, out);
                }
                // Illegal input: recovered locally, log-level notice only.
                None => debug!("rejected illegal move {}{}", from, to),
            }
        } else if self.phase == Phase::OpponentTurn {
            self.premove.set(Premove {
                from,
                to,
                promotion,
            });
            out.push(Output::Event(SessionEvent::PremoveQueued {
                from: from.to_string(),
                to: to.to_string(),
            }));
        }
    }

    /// Apply a move the rules engine accepts: record it, credit the mover's
    /// increment, and re-evaluate the session (game-over check, clock switch,
    /// think scheduling, premove drain).
    fn apply_move(&mut self, mv: chess::ChessMove, out: &mut Vec<Output>) -> bool {
        let mover = self.session.side_to_move();
        if !self.session.try_move(mv) {
            debug!("rules engine rejected {}", crate::session::uci(mv));
            return false;
        }
        self.selected = None;
        self.clock.add_increment(mover);

        let record = match self.session.moves().last() {
            Some(record) => record.san.clone(),
            None => String::new(),
        };
        out.push(Output::Event(SessionEvent::MoveApplied {
            from: mv.get_source().to_string(),
            to: mv.get_dest().to_string(),
            san: record,
            fen: self.session.fen(),
        }));

        self.after_move(out);
        true
    }

    fn after_move(&mut self, out: &mut Vec<Output>) {
        if let Some(over) = self.session.evaluate_end() {
            self.finish(over, out);
            return;
        }

        let to_move = self.session.side_to_move();
        self.phase = self.turn_phase(to_move);
        self.clock.start(to_move);
        self.push_status(out);

        match self.phase {
            Phase::OpponentTurn => self.schedule_think(out),
            Phase::PlayerTurn => self.drain_premove(out),
            _ => {}
        }
    }

    /// Attempt the queued premove exactly once, now that it is the owner's
    /// turn. The slot is emptied no matter what happens.
    fn drain_premove(&mut self, out: &mut Vec<Output>) {
        let Some(pm) = self.premove.take() else {
            return;
        };
        out.push(Output::Event(SessionEvent::PremoveCleared));
        match self.session.find_move(pm.from, pm.to, pm.promotion) {
            Some(mv) => {
                self.apply_move(mv, out);
            }
            None => debug!("premove {}{} no longer legal, discarded", pm.from, pm.to),
        }
    }

    /// Hand the automated opponent a think ticket, unless one is in flight.
    fn schedule_think(&mut self, out: &mut Vec<Output>) {
        if self.personality.is_none() {
            return;
        }
        if self.thinking {
            debug!("think already in flight, not starting another");
            return;
        }
        self.thinking = true;
        self.think_epoch += 1;
        self.push_status(out);

        let to_move = self.session.side_to_move();
        let clock = self.clock.remaining_ms(to_move).map(|remaining_ms| ClockSnapshot {
            remaining_ms,
            increment_ms: self.config.time_control.increment * 1000,
        });
        out.push(Output::Think(ThinkTicket {
            epoch: self.think_epoch,
            board: self.session.board(),
            clock,
            move_number: self.session.move_number(),
        }));
    }

    fn think_resolved(&mut self, outcome: ThinkOutcome, out: &mut Vec<Output>) {
        if outcome.epoch != self.think_epoch || self.phase != Phase::OpponentTurn {
            // Designed race outcome: the game ended or restarted while the
            // think was in flight.
            debug!("discarding stale think result (epoch {})", outcome.epoch);
            return;
        }
        self.thinking = false;
        match outcome.mv {
            Some(mv) => {
                if !self.apply_move(mv, out) {
                    warn!("search result rejected by rules engine, skipping");
                    self.push_status(out);
                }
            }
            None => warn!("think cycle found no legal moves; leaving state unchanged"),
        }
    }

    fn resign(&mut self, out: &mut Vec<Output>) {
        if !matches!(self.phase, Phase::PlayerTurn | Phase::OpponentTurn) {
            return;
        }
        // Resignation is a user intent; with an automated opponent the human
        // is always the resigner, in hot-seat play the side to move is.
        let resigner = if self.personality.is_some() {
            self.config.player_color
        } else {
            self.session.side_to_move()
        };
        self.finish(GameOver::Resignation { winner: !resigner }, out);
    }

    fn reset(&mut self, out: &mut Vec<Output>) {
        out.push(Output::ReleaseEngine);
        self.session = GameSession::new();
        self.clock = ChessClock::new(self.config.time_control);
        self.premove.clear();
        self.selected = None;
        self.thinking = false;
        // No epoch bump here: restarting into the opponent's turn bumps it in
        // schedule_think, and the NotStarted->PlayerTurn path is already
        // covered by the phase check when a stale result arrives.
        self.phase = Phase::NotStarted;
        self.start(out);
    }

    fn clock_tick(&mut self, out: &mut Vec<Output>) {
        if !matches!(self.phase, Phase::PlayerTurn | Phase::OpponentTurn) {
            return;
        }
        if !self.clock.is_enabled() {
            return;
        }
        let flagged = self.clock.tick();
        out.push(Output::Event(SessionEvent::ClockTick {
            white_ms: self.clock.remaining_ms(Color::White),
            black_ms: self.clock.remaining_ms(Color::Black),
        }));
        if let Some(flagged) = flagged {
            self.finish(GameOver::TimeForfeit { winner: !flagged }, out);
        }
    }

    /// Latch game-over: stop the clocks and invalidate any in-flight think.
    fn finish(&mut self, over: GameOver, out: &mut Vec<Output>) {
        self.phase = Phase::GameOver(over);
        self.clock.stop();
        self.premove.clear();
        self.selected = None;
        self.thinking = false;
        self.think_epoch += 1;
        self.push_status(out);
    }

    fn status(&self) -> String {
        match self.phase {
            Phase::NotStarted => "Waiting to start".to_string(),
            Phase::GameOver(over) => over.to_string(),
            _ if self.thinking => match self.personality {
                Some(p) => format!("{} is thinking...", p.display_name),
                None => "Thinking...".to_string(),
            },
            _ => {
                let side = if self.session.side_to_move() == Color::White {
                    "White"
                } else {
                    "Black"
                };
                if self.session.in_check() {
                    format!("{} to move (check)", side)
                } else {
                    format!("{} to move", side)
                }
            }
        }
    }

    fn push_status(&self, out: &mut Vec<Output>) {
        out.push(Output::Event(SessionEvent::StatusChanged {
            status: self.status(),
        }));
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod machine_tests;
