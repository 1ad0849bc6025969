//! Simulated slow actions (login, code submission, profile and settings saves).
//!
//! Each view owns a [`ViewScope`]. Work scheduled through it runs after a fixed delay, and
//! dropping the scope aborts whatever has not completed, so a torn-down view never receives
//! a late completion.

use std::{future::Future, time::Duration};

use tokio::{sync::oneshot, task::JoinSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("action `{0}` was cancelled before it completed")]
pub struct Cancelled(pub &'static str);

pub struct ViewScope {
    view: &'static str,
    tasks: JoinSet<()>,
}

impl ViewScope {
    pub fn new(view: &'static str) -> Self {
        Self {
            view,
            tasks: JoinSet::new(),
        }
    }

    /// Runs `action` once `delay` has passed and waits for its output
    pub async fn after<F>(&mut self, delay: Duration, action: F) -> Result<F::Output, Cancelled>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let rx = self.spawn_after(delay, action);
        rx.await.map_err(|_| Cancelled(self.view))
    }

    /// Schedules `action` without waiting. The receiver errors if the scope goes away first.
    pub fn spawn_after<F>(&mut self, delay: Duration, action: F) -> oneshot::Receiver<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let view = self.view;

        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Completing delayed action for {view}");
            let _ = tx.send(action.await);
        });

        rx
    }

    /// Aborts every pending action
    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!("Cancelling {} pending action(s) for {}", self.tasks.len(), self.view);
        }
        self.tasks.abort_all();
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completes_after_delay() {
        let mut scope = ViewScope::new("login");
        let started = tokio::time::Instant::now();

        let out = scope.after(Duration::from_secs(1), async { 7 }).await;

        assert_eq!(out, Ok(7));
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_aborts_pending_completion() {
        let fired = Arc::new(AtomicBool::new(false));

        let mut scope = ViewScope::new("student/code");
        let flag = fired.clone();
        let rx = scope.spawn_after(Duration::from_millis(1500), async move {
            flag.store(true, Ordering::SeqCst);
        });
        drop(scope);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(rx.await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_waiting_view_cancels() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let view = async move {
            let mut scope = ViewScope::new("profile");
            scope
                .after(Duration::from_secs(1), async move {
                    flag.store(true, Ordering::SeqCst);
                })
                .await
        };

        let timed_out = tokio::time::timeout(Duration::from_millis(200), view).await;
        assert!(timed_out.is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
