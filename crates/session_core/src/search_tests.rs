use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

struct StubBackend {
    ready_result: Option<Result<(), SearchError>>,
    released: Arc<AtomicBool>,
}

impl StubBackend {
    fn new(ready_result: Result<(), SearchError>) -> (Box<dyn SearchBackend>, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let backend = Box::new(Self {
            ready_result: Some(ready_result),
            released: Arc::clone(&released),
        });
        (backend, released)
    }
}

#[async_trait]
impl SearchBackend for StubBackend {
    async fn ready(&mut self) -> Result<(), SearchError> {
        match self.ready_result.take() {
            Some(result) => result,
            // A second readiness wait hangs forever.
            None => std::future::pending().await,
        }
    }

    async fn best_move(&mut self, fen: &str, limits: SearchLimits) -> Result<String, SearchError> {
        Ok(format!("fen={} depth={}", fen, limits.depth))
    }

    async fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn test_start_engine_serves_requests() {
    let (backend, released) = StubBackend::new(Ok(()));
    let engine = start_engine(backend, Duration::from_secs(1)).await.unwrap();

    let reply = engine
        .best_move("some-fen", SearchLimits::depth(6))
        .await
        .unwrap();
    assert_eq!(reply, "fen=some-fen depth=6");
    assert!(!released.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_release_stops_the_task() {
    let (backend, released) = StubBackend::new(Ok(()));
    let engine = start_engine(backend, Duration::from_secs(1)).await.unwrap();

    engine.release().await;
    // Give the collaborator task its final poll.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(released.load(Ordering::SeqCst));

    let err = engine
        .best_move("some-fen", SearchLimits::depth(6))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Closed));
}

#[tokio::test(start_paused = true)]
async fn test_ready_timeout_releases_backend() {
    struct NeverReady {
        released: Arc<AtomicBool>,
    }

    #[async_trait]
    impl SearchBackend for NeverReady {
        async fn ready(&mut self) -> Result<(), SearchError> {
            std::future::pending().await
        }

        async fn best_move(
            &mut self,
            _fen: &str,
            _limits: SearchLimits,
        ) -> Result<String, SearchError> {
            Err(SearchError::Failed("unreachable".to_string()))
        }

        async fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    let released = Arc::new(AtomicBool::new(false));
    let backend = Box::new(NeverReady {
        released: Arc::clone(&released),
    });

    let err = start_engine(backend, Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::ReadyTimeout));
    assert!(released.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_startup_failure_releases_backend() {
    let (backend, released) =
        StubBackend::new(Err(SearchError::StartupFailed("bad binary".to_string())));

    let err = start_engine(backend, Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, SearchError::StartupFailed(_)));
    assert!(released.load(Ordering::SeqCst));
}
