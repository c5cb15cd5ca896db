//! The execution facility that runs listener callbacks off the ingest path.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// A unit of listener work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Non-blocking task submission. Callers never learn how or when a task runs.
pub trait EventQueue: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs tasks one at a time, in submission order, on tokio's blocking pool.
///
/// Submission goes through an unbounded channel, so no task is ever dropped
/// while the worker is alive.
pub struct TokioEventQueue {
    task_tx: mpsc::UnboundedSender<Task>,
}

impl TokioEventQueue {
    /// Spawn the worker on the current runtime. The worker exits once every
    /// queue handle is dropped and the backlog is drained.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(worker(task_rx));
        (Self { task_tx }, handle)
    }
}

impl EventQueue for TokioEventQueue {
    fn execute(&self, task: Task) {
        if self.task_tx.send(task).is_err() {
            warn!("Event queue closed, dropping listener task");
        }
    }
}

async fn worker(mut task_rx: mpsc::UnboundedReceiver<Task>) {
    while let Some(task) = task_rx.recv().await {
        // Listener code may block; keep it off the runtime's async workers.
        if let Err(e) = tokio::task::spawn_blocking(task).await {
            if e.is_panic() {
                let panic = e.into_panic();
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(panic = %message, "Listener task panicked");
            } else {
                error!(error = %e, "Listener task cancelled");
            }
        }
    }
}
