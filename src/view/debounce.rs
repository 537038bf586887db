//! Trailing-edge debouncer.
//!
//! Each call to [`Debouncer::schedule`] aborts the pending task, if any, and
//! arms a new one that runs after the quiet window.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Run `task` once the window elapses with no further calls.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task.await;
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending task. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match pending {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn test_rapid_calls_coalesce_into_one_run() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(String::new()));

        for value in ["a", "ab", "abc"] {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = value.to_string();
            });
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        tokio::time::sleep(WINDOW).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), "abc");
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_only_after_quiet_window() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_calls_each_run() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&runs);
            debouncer.schedule(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(WINDOW * 2).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_run() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
