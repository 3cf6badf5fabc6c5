//! Request pacing for the sequential fetch loops
//!
//! The pipeline never has more than one request in flight. The pacer only
//! enforces a minimum interval between the start of consecutive requests so
//! a long sweep does not hammer the audited site.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive requests
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum time between the start of two requests
    delay: Duration,

    /// When the previous request was allowed through
    last_request: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer; a zero delay never waits
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Waits until the next request may start, then records it
    ///
    /// The first call always returns immediately.
    pub async fn wait_turn(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
