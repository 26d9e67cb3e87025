//! Graceful shutdown
//!
//! The transports stop taking new requests when the controller's token is
//! cancelled, then wait for in-flight tool calls to finish before the cache
//! and calendar are closed.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default drain timeout in seconds
const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 10;

/// Coordinates cancellation and draining of in-flight requests
#[derive(Debug)]
pub struct ShutdownController {
    cancel_token: CancellationToken,
    shutdown_initiated: AtomicBool,
    active_tasks: AtomicU32,
    timeout: Duration,
}

impl ShutdownController {
    /// Create a controller with the default drain timeout
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS))
    }

    /// Create a controller with a custom drain timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            cancel_token: CancellationToken::new(),
            shutdown_initiated: AtomicBool::new(false),
            active_tasks: AtomicU32::new(0),
            timeout,
        })
    }

    /// Token cancelled when shutdown starts
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Whether shutdown has started
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Track an in-flight request until the guard is dropped
    pub fn register_task(self: &Arc<Self>) -> TaskGuard {
        self.active_tasks.fetch_add(1, Ordering::SeqCst);
        TaskGuard {
            controller: Arc::clone(self),
        }
    }

    /// Number of in-flight requests
    #[must_use]
    pub fn active_task_count(&self) -> u32 {
        self.active_tasks.load(Ordering::SeqCst)
    }

    /// Cancel the token and wait (bounded) for in-flight requests
    pub async fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Shutdown already initiated");
            return;
        }

        info!("Initiating graceful shutdown...");
        self.cancel_token.cancel();

        let drain_start = std::time::Instant::now();
        loop {
            let active = self.active_task_count();
            if active == 0 {
                info!("All requests completed");
                break;
            }
            if drain_start.elapsed() >= self.timeout {
                warn!(
                    active_tasks = active,
                    timeout_secs = self.timeout.as_secs(),
                    "Drain timeout exceeded, abandoning in-flight requests"
                );
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Decrements the in-flight count on drop
#[derive(Debug)]
pub struct TaskGuard {
    controller: Arc<ShutdownController>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.controller.active_tasks.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wait for Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed the error is logged and that signal is
/// never observed.
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_cancels_token() {
        let controller = ShutdownController::new();
        let token = controller.token();
        assert!(!controller.is_shutting_down());

        controller.shutdown().await;

        assert!(controller.is_shutting_down());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_task_guard_counts() {
        let controller = ShutdownController::new();
        {
            let _a = controller.register_task();
            let _b = controller.register_task();
            assert_eq!(controller.active_task_count(), 2);
        }
        assert_eq!(controller.active_task_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_tasks() {
        let controller = ShutdownController::with_timeout(Duration::from_secs(5));
        let guard = controller.register_task();

        let waiter = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.shutdown().await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert_eq!(controller.active_task_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_times_out() {
        let controller = ShutdownController::with_timeout(Duration::from_millis(100));
        let _guard = controller.register_task();
        controller.shutdown().await;
        assert_eq!(controller.active_task_count(), 1);
    }
}
