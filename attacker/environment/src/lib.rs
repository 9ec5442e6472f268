//! Runtime construction and shutdown wiring, grounded on the teacher's
//! `environment` crate: builds the tokio runtime and a `TaskExecutor`, and
//! blocks the main thread until Ctrl-C/SIGTERM fires the shared shutdown
//! channel every spawned component observes (`task_executor::shutdown_channel`).

use task_executor::TaskExecutor;
use tokio::runtime::{Builder, Runtime};

pub struct Environment {
    runtime: Runtime,
    executor: TaskExecutor,
    signal_tx: async_channel::Sender<()>,
}

impl Environment {
    pub fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread().enable_all().build()?;
        let (signal_tx, signal_rx) = task_executor::shutdown_channel();
        let executor = TaskExecutor::new(runtime.handle().clone(), signal_rx);
        Ok(Environment {
            runtime,
            executor,
            signal_tx,
        })
    }

    pub fn executor(&self) -> TaskExecutor {
        self.executor.clone()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Blocks the calling thread until a termination signal arrives, then
    /// fires the shutdown channel so every component torn down through
    /// `TaskExecutor` unwinds together.
    pub fn block_until_shutdown(&self) {
        let signal_tx = self.signal_tx.clone();
        self.runtime.block_on(async move {
            wait_for_signal().await;
            let _ = signal_tx.send(()).await;
        });
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    tokio::select! {
        _ = sigterm.recv() => tracing::info!("received SIGTERM"),
        _ = sigint.recv() => tracing::info!("received SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let (tx, rx) = std::sync::mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .expect("failed to install ctrl-c handler");
    let _ = tokio::task::spawn_blocking(move || rx.recv()).await;
    tracing::info!("received ctrl-c");
}
