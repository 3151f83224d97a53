// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic refresh loop with cooperative cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something the refresh loop reloads on every tick.
///
/// `refresh` may block on file I/O; the loop runs it on the blocking pool.
pub trait Refreshable: Send + Sync + 'static {
    fn refresh(&self);
}

/// Handle to a running refresh loop.
pub struct RefreshHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Token that stops the loop when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the loop to stop and waits for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            debug!(error = %e, "refresh task ended abnormally");
        }
    }
}

/// Spawns a loop that refreshes `target` immediately and then every `period`.
///
/// Each refresh runs under [`tokio::task::spawn_blocking`]. The loop exits at
/// the next await point once `cancel` is triggered; a refresh already in
/// progress completes first.
pub fn spawn_refresh<T: Refreshable>(
    target: Arc<T>,
    period: Duration,
    cancel: CancellationToken,
) -> RefreshHandle {
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let target = target.clone();
                    if let Err(e) = tokio::task::spawn_blocking(move || target.refresh()).await {
                        warn!(error = %e, "mapping refresh panicked");
                    }
                }
                _ = token.cancelled() => {
                    info!("mapping refresh loop shutting down");
                    break;
                }
            }
        }
    });

    RefreshHandle { cancel, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Refreshable for Counter {
        fn refresh(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Counter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_on_every_tick_until_stopped() {
        let counter = Arc::new(Counter::default());
        let handle = spawn_refresh(
            counter.clone(),
            Duration::from_secs(60),
            CancellationToken::new(),
        );

        // Ticks at 0s, 60s and 120s.
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(counter.count(), 3);

        handle.stop().await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(counter.count(), 3);
    }

    struct ThreadRecorder(std::sync::Mutex<Option<std::thread::ThreadId>>);

    impl Refreshable for ThreadRecorder {
        fn refresh(&self) {
            *self.0.lock().unwrap() = Some(std::thread::current().id());
        }
    }

    #[tokio::test]
    async fn refresh_runs_off_the_runtime_thread() {
        let seen = Arc::new(ThreadRecorder(std::sync::Mutex::new(None)));
        let handle = spawn_refresh(seen.clone(), Duration::from_secs(60), CancellationToken::new());

        while seen.0.lock().unwrap().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.stop().await;

        let refreshed_on = seen.0.lock().unwrap().unwrap();
        assert_ne!(refreshed_on, std::thread::current().id());
    }

    #[tokio::test(start_paused = true)]
    async fn external_token_cancels_loop() {
        let counter = Arc::new(Counter::default());
        let cancel = CancellationToken::new();
        let handle = spawn_refresh(counter.clone(), Duration::from_secs(10), cancel.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(handle.is_finished());
        assert_eq!(counter.count(), 1);
    }
}
