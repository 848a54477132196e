//! Debounced validation gate
//!
//! Every scheduled check gets a sequence number from a monotonically
//! increasing counter. Only the latest number is current; a result carrying
//! an older number is stale and must be dropped by the caller.
//!
//! The debounce timer is a task that only sleeps. When the window elapses it
//! spawns the job as a separate task, so [`ValidationGate::cancel`] releases
//! the timer without aborting a validator call that is already running.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Debounce timer plus request sequence
#[derive(Debug, Default)]
pub struct ValidationGate {
    sequence: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ValidationGate {
    /// Create gate with no pending timer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number, making all earlier ones stale
    #[inline]
    pub fn issue(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest issued sequence number
    #[inline]
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Check if `sequence` is still the latest
    #[inline]
    #[must_use]
    pub fn is_current(&self, sequence: u64) -> bool {
        self.latest() == sequence
    }

    /// Run `job` once `window` elapses with no newer schedule
    ///
    /// Replaces (and aborts) any timer that has not fired yet. Must be called
    /// from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, window: Duration, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            tokio::spawn(job());
        });

        if let Some(previous) = self.timer.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Check if a timer is waiting to fire
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Abort the pending timer and make every issued number stale
    pub fn cancel(&self) {
        self.abort_timer();
        self.issue();
    }

    fn abort_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }
}

impl Drop for ValidationGate {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn issue_is_monotonic() {
        let gate = ValidationGate::new();
        let first = gate.issue();
        let second = gate.issue();
        assert!(second > first);
        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
    }

    #[test]
    fn cancel_makes_latest_stale() {
        let gate = ValidationGate::new();
        let seq = gate.issue();
        gate.cancel();
        assert!(!gate.is_current(seq));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_window() {
        let gate = ValidationGate::new();
        let fired = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&fired);
        gate.schedule(Duration::from_millis(500), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(gate.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_pending_timer() {
        let gate = ValidationGate::new();
        let last = Arc::new(AtomicU64::new(0));

        for value in 1..=3u64 {
            let last = Arc::clone(&last);
            gate.schedule(Duration::from_millis(500), move || async move {
                last.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_releases_timer() {
        let gate = ValidationGate::new();
        let fired = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&fired);
        gate.schedule(Duration::from_millis(500), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        gate.cancel();
        assert!(!gate.is_pending());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
