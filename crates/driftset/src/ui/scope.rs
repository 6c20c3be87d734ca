//! Write tasks owned by a screen.

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Fire-and-forget writes launched by one screen.
///
/// Writes run in the background while the screen keeps responding, one at a
/// time and in the order they were spawned: each write waits for the previous
/// one to finish, so a later full-row update always lands last. Dropping the
/// scope aborts whatever has not finished; call [`settle`](Self::settle) to
/// wait for completion and surface failures.
#[derive(Debug, Default)]
pub struct ScreenScope {
    tasks: JoinSet<Result<()>>,
    /// Fires when the most recently spawned write finishes.
    last_done: Option<oneshot::Receiver<()>>,
}

impl ScreenScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a write after every write spawned before it. Must be called
    /// from within a tokio runtime.
    pub fn spawn<F>(&mut self, write: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let previous = self.last_done.replace(done_rx);
        self.tasks.spawn(async move {
            if let Some(previous) = previous {
                // A panicked or aborted predecessor drops its sender instead.
                let _ = previous.await;
            }
            let outcome = write.await;
            let _ = done_tx.send(());
            outcome
        });
        debug!("Spawned background write ({} pending)", self.tasks.len());
    }

    /// Number of writes not yet joined.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every outstanding write.
    ///
    /// # Errors
    ///
    /// Returns the first failure: a store error from the write itself, or
    /// [`Error::BackgroundTask`] if a write panicked or was cancelled. The
    /// remaining writes are still joined.
    pub async fn settle(&mut self) -> Result<()> {
        debug!("Settling {} background writes", self.pending());
        let mut first_failure = None;

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined.map_err(Error::from).and_then(|result| result);
            if let Err(e) = outcome {
                error!("Background write failed: {}", e);
                first_failure.get_or_insert(e);
            }
        }
        self.last_done = None;

        first_failure.map_or(Ok(()), Err)
    }
}
