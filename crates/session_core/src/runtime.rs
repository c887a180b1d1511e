//! Tokio wiring for a live session.
//!
//! The machine itself is synchronous; this module gives it a pulse. One task
//! owns the [`SessionMachine`] and serializes every input (user commands,
//! 1 Hz clock ticks, resolved think cycles). A second task owns the
//! [`AiOrchestrator`] and works through think tickets one at a time, which
//! enforces the one-think-cycle-per-session invariant even if scheduling ever
//! misbehaved upstream.

use std::time::Duration;

use chess::{Piece, Square};
use log::debug;
use tokio::sync::mpsc;

use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::machine::{Input, Output, SessionMachine};
use crate::orchestrator::{AiOrchestrator, ThinkOutcome};
use crate::personality::Personality;
use crate::search::EngineSpawner;

/// User intents accepted by a running session.
#[derive(Debug)]
pub enum Command {
    SelectSquare(Square),
    AttemptMove {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
    Resign,
    Reset,
}

enum OrchestratorCmd {
    Think(crate::orchestrator::ThinkTicket),
    Reset,
}

/// Client end of a spawned session.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    events: mpsc::Receiver<SessionEvent>,
}

impl SessionHandle {
    /// Next event from the core; `None` once the session task has stopped.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Send a user intent; returns false if the session has stopped.
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub async fn select_square(&self, square: Square) -> bool {
        self.send(Command::SelectSquare(square)).await
    }

    pub async fn attempt_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> bool {
        self.send(Command::AttemptMove {
            from,
            to,
            promotion,
        })
        .await
    }

    pub async fn resign(&self) -> bool {
        self.send(Command::Resign).await
    }

    pub async fn reset(&self) -> bool {
        self.send(Command::Reset).await
    }
}

/// Spawn a session onto the current tokio runtime.
///
/// The session stops when the handle is dropped or stops consuming events;
/// the search resource is released on the way out.
pub fn spawn_session(config: SessionConfig, spawner: Box<dyn EngineSpawner>) -> SessionHandle {
    let (command_tx, mut command_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(64);
    let (orch_tx, mut orch_rx) = mpsc::channel::<OrchestratorCmd>(8);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ThinkOutcome>(8);

    // Orchestrator task: one think cycle at a time. Spawned even for
    // human-opponent sessions; it simply never receives a ticket.
    let personality = config
        .personality()
        .unwrap_or_else(Personality::strongest);
    tokio::spawn(async move {
        let mut orchestrator = AiOrchestrator::new(personality, spawner);
        while let Some(cmd) = orch_rx.recv().await {
            match cmd {
                OrchestratorCmd::Think(ticket) => {
                    let outcome = orchestrator.think(ticket).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
                OrchestratorCmd::Reset => orchestrator.reset().await,
            }
        }
        orchestrator.reset().await;
        debug!("orchestrator task stopped");
    });

    tokio::spawn(async move {
        let mut machine = SessionMachine::new(config);
        // First tick belongs one full period out; `interval` would fire
        // immediately and shave a second off the starting clock.
        let period = Duration::from_secs(1);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let outputs = machine.handle(Input::Start);
        if !dispatch(outputs, &event_tx, &orch_tx).await {
            return;
        }

        loop {
            let input = tokio::select! {
                command = command_rx.recv() => match command {
                    Some(Command::SelectSquare(square)) => Input::SelectSquare(square),
                    Some(Command::AttemptMove { from, to, promotion }) => Input::AttemptMove {
                        from,
                        to,
                        promotion,
                    },
                    Some(Command::Resign) => Input::Resign,
                    Some(Command::Reset) => Input::Reset,
                    None => break,
                },
                outcome = outcome_rx.recv() => match outcome {
                    Some(outcome) => Input::ThinkResolved(outcome),
                    None => break,
                },
                _ = ticker.tick() => Input::ClockTick,
            };

            let outputs = machine.handle(input);
            if !dispatch(outputs, &event_tx, &orch_tx).await {
                break;
            }
        }

        // Release the search resource on the way out.
        let _ = orch_tx.send(OrchestratorCmd::Reset).await;
        debug!("session task stopped");
    });

    SessionHandle {
        commands: command_tx,
        events: event_rx,
    }
}

/// Fan machine outputs out to their consumers. Returns false once the event
/// consumer is gone and the session should stop.
async fn dispatch(
    outputs: Vec<Output>,
    event_tx: &mpsc::Sender<SessionEvent>,
    orch_tx: &mpsc::Sender<OrchestratorCmd>,
) -> bool {
    for output in outputs {
        match output {
            Output::Event(event) => {
                if event_tx.send(event).await.is_err() {
                    return false;
                }
            }
            Output::Think(ticket) => {
                let _ = orch_tx.send(OrchestratorCmd::Think(ticket)).await;
            }
            Output::ReleaseEngine => {
                let _ = orch_tx.send(OrchestratorCmd::Reset).await;
            }
        }
    }
    true
}
