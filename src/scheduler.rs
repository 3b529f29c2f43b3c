//! # Scheduled Tasks
//!
//! A delayed action on the tokio runtime that is cancelled when its handle is
//! dropped. Owners keep the handle for as long as the action is still wanted;
//! every exit path (explicit cancel, reset, owner teardown) releases it.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Run `action` once after `delay` on the given runtime.
    pub fn after<F>(runtime: &Handle, delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Abort the action if it has not run yet.
    pub fn cancel(mut self) {
        self.abort();
    }

    /// Release the handle without aborting. Used by the action itself once it
    /// is running, so that clearing its own slot does not abort it.
    pub fn detach(mut self) {
        self.handle.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flagged() -> (Arc<AtomicBool>, impl FnOnce() + Send + 'static) {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = flag.clone();
        (flag, move || setter.store(true, Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_runs_after_delay() {
        let (flag, action) = flagged();
        let task = ScheduledTask::after(&Handle::current(), Duration::from_millis(1000), action);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!flag.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(flag.load(Ordering::SeqCst));
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_action() {
        let (flag, action) = flagged();
        let task = ScheduledTask::after(&Handle::current(), Duration::from_millis(1000), action);

        tokio::time::sleep(Duration::from_millis(500)).await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_action() {
        let (flag, action) = flagged();
        {
            let _task =
                ScheduledTask::after(&Handle::current(), Duration::from_millis(1000), action);
        }
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert!(!flag.load(Ordering::SeqCst));
    }
}
