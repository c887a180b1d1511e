//! Search collaborator interface.
//!
//! The actual search algorithm lives outside this crate. What lives here is
//! the capability surface the orchestrator needs: a one-time readiness signal
//! with a bounded deadline, an asynchronous best-move request, and an
//! explicit release. A backend runs inside its own task and is spoken to over
//! an mpsc request / oneshot response pair, so a test harness can substitute
//! a deterministic stub.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Search limits handed to the collaborator.
///
/// The collaborator is expected to self-bound: it must respect whichever of
/// the two limits is reached first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum search depth in plies (half-moves)
    pub depth: u8,
    /// Maximum time allowed for this move (None = infinite)
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
        }
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
        }
    }
}

/// Failures surfaced by the search collaborator.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The readiness signal never arrived within its deadline.
    #[error("search collaborator did not become ready in time")]
    ReadyTimeout,
    /// The collaborator failed while starting up.
    #[error("search collaborator failed to start: {0}")]
    StartupFailed(String),
    /// The collaborator task has terminated.
    #[error("search collaborator is no longer available")]
    Closed,
    /// A search request failed.
    #[error("search failed: {0}")]
    Failed(String),
}

/// Capability interface over an external search engine.
#[async_trait]
pub trait SearchBackend: Send {
    /// Resolve once the engine is ready to accept requests.
    async fn ready(&mut self) -> Result<(), SearchError>;

    /// Request the best move for `fen`, returned in compact coordinate form
    /// (e.g. `"e2e4"`, `"e7e8q"`).
    async fn best_move(&mut self, fen: &str, limits: SearchLimits) -> Result<String, SearchError>;

    /// Free the engine's resources. Called exactly once, on session reset or
    /// when the handle is dropped.
    async fn release(&mut self) {}
}

/// Factory producing fresh backends; lets the orchestrator create the
/// resource lazily and recreate it after a reset.
pub trait EngineSpawner: Send {
    fn spawn_backend(&self) -> Box<dyn SearchBackend>;
}

enum EngineRequest {
    BestMove {
        fen: String,
        limits: SearchLimits,
        reply: oneshot::Sender<Result<String, SearchError>>,
    },
    Release,
}

/// Handle to a running search-collaborator task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Ask the collaborator for its best move.
    pub async fn best_move(
        &self,
        fen: &str,
        limits: SearchLimits,
    ) -> Result<String, SearchError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(EngineRequest::BestMove {
                fen: fen.to_string(),
                limits,
                reply,
            })
            .await
            .map_err(|_| SearchError::Closed)?;
        response.await.map_err(|_| SearchError::Closed)?
    }

    /// Release the collaborator's resources and stop its task.
    pub async fn release(&self) {
        let _ = self.tx.send(EngineRequest::Release).await;
    }
}

/// Start a backend: wait for readiness under `ready_deadline`, then serve
/// requests from a dedicated task until released.
pub async fn start_engine(
    mut backend: Box<dyn SearchBackend>,
    ready_deadline: Duration,
) -> Result<EngineHandle, SearchError> {
    match tokio::time::timeout(ready_deadline, backend.ready()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            backend.release().await;
            return Err(err);
        }
        Err(_) => {
            warn!(
                "search collaborator missed its readiness deadline ({:?})",
                ready_deadline
            );
            backend.release().await;
            return Err(SearchError::ReadyTimeout);
        }
    }

    let (tx, mut rx) = mpsc::channel(8);
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            match request {
                EngineRequest::BestMove { fen, limits, reply } => {
                    let result = backend.best_move(&fen, limits).await;
                    // The requester may have lost interest; that is fine.
                    let _ = reply.send(result);
                }
                EngineRequest::Release => break,
            }
        }
        backend.release().await;
        debug!("search collaborator released");
    });

    Ok(EngineHandle { tx })
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
