//! Detached background work
//!
//! Counter updates that must not delay a response are handed to a
//! [`TaskSpawner`]. Production code runs them on the Tokio runtime; tests use
//! a spawner that holds tasks until they are flushed explicitly.

use futures::future::BoxFuture;

/// A unit of detached work. Tasks log their own failures.
pub type BoxTask = BoxFuture<'static, ()>;

/// Runs detached tasks that the caller never awaits
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, task: BoxTask);
}

/// Spawns tasks onto the ambient Tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxTask) {
        tokio::spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_tokio_spawner_runs_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let (tx, rx) = tokio::sync::oneshot::channel();

        let flag = ran.clone();
        TokioSpawner.spawn(Box::pin(async move {
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        }));

        rx.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
