//! Shared task-spawning handle (grounded on the teacher's `task_executor`):
//! every long-running loop (C9's pollers, the RPC/OpenAPI servers) spawns
//! through this so a single shutdown signal reaches all of them, and every
//! delay action (C5) sleeps through `cancellable_sleep` so a shutdown or
//! strategy reload doesn't have to wait out a pending multi-second delay.

use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Creates the shutdown broadcast pair: callers hold the `Sender` and fire
/// it once; every `TaskExecutor` clone observes it via its `Receiver`.
pub fn shutdown_channel() -> (async_channel::Sender<()>, async_channel::Receiver<()>) {
    async_channel::bounded(1)
}

#[derive(Clone)]
pub struct TaskExecutor {
    handle: Handle,
    exit: async_channel::Receiver<()>,
}

impl TaskExecutor {
    pub fn new(handle: Handle, exit: async_channel::Receiver<()>) -> Self {
        TaskExecutor { handle, exit }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Spawns a task that is abandoned (not joined) on shutdown.
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static, name: &'static str) {
        let exit = self.exit.clone();
        self.handle.spawn(async move {
            futures::pin_mut!(task);
            futures::future::select(task, Box::pin(exit.recv())).await;
            tracing::debug!(task = name, "task exited");
        });
    }

    /// Spawns a task whose result the caller wants; resolves to `None` if
    /// shutdown fired before the task finished.
    pub fn spawn_handle<R: Send + 'static>(
        &self,
        task: impl Future<Output = R> + Send + 'static,
        name: &'static str,
    ) -> JoinHandle<Option<R>> {
        let exit = self.exit.clone();
        self.handle.spawn(async move {
            futures::pin_mut!(task);
            match futures::future::select(task, Box::pin(exit.recv())).await {
                futures::future::Either::Left((result, _)) => Some(result),
                futures::future::Either::Right(_) => {
                    tracing::debug!(task = name, "task cancelled by shutdown");
                    None
                }
            }
        })
    }

    /// Sleeps for `duration`, returning `true`, unless shutdown fires first
    /// in which case it returns `false` immediately. Every C5 delay action
    /// routes through this so a shutdown or strategy reload can interrupt
    /// an in-flight multi-second sleep.
    pub async fn cancellable_sleep(&self, duration: Duration) -> bool {
        let exit = self.exit.clone();
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = exit.recv() => false,
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.exit.is_closed() || self.exit.try_recv().is_ok()
    }

    /// A future that resolves once shutdown fires. Unlike `spawn`, which
    /// races and discards its task, this lets a caller run its own cleanup
    /// (closing an external event loop such as `jsonrpc-http-server`'s or
    /// an axum/warp `with_graceful_shutdown` future) at the moment shutdown
    /// happens rather than having its task simply abandoned.
    pub fn exit_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let exit = self.exit.clone();
        async move {
            let _ = exit.recv().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellable_sleep_completes_without_shutdown() {
        let (_tx, rx) = shutdown_channel();
        let executor = TaskExecutor::new(Handle::current(), rx);
        assert!(executor.cancellable_sleep(Duration::from_millis(5)).await);
    }

    #[tokio::test]
    async fn cancellable_sleep_is_interrupted_by_shutdown() {
        let (tx, rx) = shutdown_channel();
        let executor = TaskExecutor::new(Handle::current(), rx);
        tx.send(()).await.unwrap();
        assert!(!executor.cancellable_sleep(Duration::from_secs(30)).await);
    }

    #[tokio::test]
    async fn spawn_handle_returns_none_after_shutdown() {
        let (tx, rx) = shutdown_channel();
        let executor = TaskExecutor::new(Handle::current(), rx);
        let handle = executor.spawn_handle(
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                42
            },
            "test",
        );
        tx.send(()).await.unwrap();
        assert_eq!(handle.await.unwrap(), None);
    }
}
