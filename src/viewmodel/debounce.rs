//! Coalesces rapid successive writes for the same key.
//!
//! Scheduling a task for a key cancels whatever was still pending for that key, so only
//! the value that stays unchanged for the whole delay is written.

use std::{collections::HashMap, future::Future, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay applied when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Per-key cancel-and-reschedule timer.
#[derive(Debug)]
pub struct StockDebouncer {
    delay: Duration,
    pending: HashMap<String, JoinHandle<()>>,
}

impl Default for StockDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl StockDebouncer {
    /// Creates a debouncer that waits `delay` before running a task.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Delay between the last schedule call for a key and its task running.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `task` after the delay unless another task is scheduled for `key` first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, key: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.retain(|_, handle| !handle.is_finished());

        if let Some(previous) = self.pending.remove(key) {
            previous.abort();
            debug!("Replaced pending write for {}", key);
        }

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.pending.insert(key.to_string(), handle);
    }

    /// Cancels the pending task for `key`. Returns whether one was still waiting.
    pub fn cancel(&mut self, key: &str) -> bool {
        self.pending.remove(key).is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// Number of tasks that have not finished yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const DELAY: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_rapid_schedules_coalesce() {
        let mut debouncer = StockDebouncer::new(DELAY);
        let written = Arc::new(Mutex::new(Vec::new()));

        for stock in 1..=5 {
            let written = Arc::clone(&written);
            debouncer.schedule("med-1", async move {
                written.lock().await.push(stock);
            });
        }
        assert_eq!(debouncer.pending_count(), 1);

        tokio::time::sleep(DELAY * 4).await;
        assert_eq!(*written.lock().await, vec![5]);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let mut debouncer = StockDebouncer::new(DELAY);
        let written = Arc::new(Mutex::new(Vec::new()));

        for key in ["med-1", "med-2"] {
            let written = Arc::clone(&written);
            debouncer.schedule(key, async move {
                written.lock().await.push(key);
            });
        }
        assert_eq!(debouncer.pending_count(), 2);

        tokio::time::sleep(DELAY * 4).await;
        let mut written = written.lock().await.clone();
        written.sort_unstable();
        assert_eq!(written, vec!["med-1", "med-2"]);
    }

    #[tokio::test]
    async fn test_cancel_prevents_write() {
        let mut debouncer = StockDebouncer::new(DELAY);
        let written = Arc::new(Mutex::new(Vec::<i32>::new()));

        let sink = Arc::clone(&written);
        debouncer.schedule("med-1", async move {
            sink.lock().await.push(1);
        });
        assert!(debouncer.cancel("med-1"));
        assert!(!debouncer.cancel("med-1"));

        tokio::time::sleep(DELAY * 3).await;
        assert!(written.lock().await.is_empty());
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(StockDebouncer::default().delay(), Duration::from_millis(500));
    }
}
