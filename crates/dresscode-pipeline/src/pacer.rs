//! Pacing between documents

use dresscode_domain::traits::Pacer;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Records requested delays without sleeping
///
/// Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPacer {
    /// Create a pacer with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}
