use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::sync::Mutex;

use crate::error::FetchError;

/// Allows at most one fetch of a list to be in flight.
///
/// A caller that arrives while a fetch is running waits for it and takes its
/// outcome instead of starting another. Dropping the running future releases
/// the slot without recording a completion, so the next caller fetches anew.
pub(crate) struct FetchSlot {
    completed: AtomicU64,
    last_outcome: Mutex<Result<(), FetchError>>,
}

impl FetchSlot {
    pub(crate) fn new() -> Self {
        Self {
            completed: AtomicU64::new(0),
            last_outcome: Mutex::new(Ok(())),
        }
    }

    /// Returns `(outcome, coalesced)`.
    pub(crate) async fn run<F, Fut>(&self, fetch: F) -> (Result<(), FetchError>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), FetchError>>,
    {
        let observed = self.completed.load(Ordering::Acquire);
        let mut last_outcome = self.last_outcome.lock().await;
        if self.completed.load(Ordering::Acquire) != observed {
            return (last_outcome.clone(), true);
        }

        let outcome = fetch().await;
        *last_outcome = outcome.clone();
        self.completed.fetch_add(1, Ordering::AcqRel);
        (outcome, false)
    }

    #[cfg(test)]
    pub(crate) fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }
}
