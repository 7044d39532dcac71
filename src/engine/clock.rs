//! Time source for the poll loop.

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

/// Injected clock so poll timing can be driven without real sleeping.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Runtime clock backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
