//! Command queue with a single consumer.
//!
//! Producers call [`Dispatcher::submit`] (or [`DispatcherHandle::submit`])
//! and get a [`Ticket`] back immediately; the queue is unbounded so
//! submission never waits. One spawned worker drains the queue in FIFO order
//! and either applies each command to the local document or forwards it to a
//! daemon, depending on the [`RunMode`] the dispatcher was built with. Being
//! the only consumer is what keeps writes to the document serialized.

use crate::command::Command;
use crate::error::TerminoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

mod remote;
mod worker;

pub use remote::{RemoteAck, RemoteExecutor, RemoteReply, RemoteRequest, ReplyStatus, TcpRemoteExecutor};
pub use worker::InProcessExecutor;

/// Where the commands of one invocation are executed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Apply to the settings file from this process.
    #[default]
    InProcess,
    /// Forward to a running `termino daemon`.
    OutOfProcess,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProcess => write!(f, "in-process"),
            Self::OutOfProcess => write!(f, "out-of-process"),
        }
    }
}

/// What the in-process executor did with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Applied, persisted and recorded on the undo stack.
    Applied { executed_at: DateTime<Utc> },
    /// `undone` may be smaller than `requested` when history ran short.
    Undone { requested: usize, undone: usize },
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { executed_at } => {
                write!(f, "applied at {}", executed_at.format("%Y-%m-%dT%H:%M:%SZ"))
            }
            Self::Undone { undone: 0, .. } => write!(f, "nothing to undo"),
            Self::Undone { requested, undone } if requested == undone => {
                write!(f, "undid {undone} command(s)")
            }
            Self::Undone { requested, undone } => {
                write!(f, "undid {undone} of {requested} requested command(s)")
            }
        }
    }
}

/// Terminal state of a command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed(Completion),
    Forwarded(RemoteAck),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(completion) => write!(f, "{completion}"),
            Self::Forwarded(ack) => write!(f, "daemon: {}", ack.summary),
        }
    }
}

/// Counts reported by the worker once the queue has been closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Set when a fatal error stopped execution; later commands were aborted.
    pub halted: Option<String>,
}

struct Job {
    command: Command,
    reply: oneshot::Sender<Result<CommandOutcome, TerminoError>>,
}

/// Pending result of one submitted command.
pub struct Ticket {
    rx: oneshot::Receiver<Result<CommandOutcome, TerminoError>>,
}

impl Ticket {
    /// Wait for the worker to finish with this command.
    pub async fn outcome(self) -> Result<CommandOutcome, TerminoError> {
        self.rx.await.unwrap_or_else(|_| {
            Err(TerminoError::Aborted(
                "dispatcher stopped before the command ran".to_string(),
            ))
        })
    }
}

/// Cloneable producer side of a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatcherHandle {
    jobs: mpsc::UnboundedSender<Job>,
}

impl DispatcherHandle {
    /// Queue `command`; never blocks.
    pub fn submit(&self, command: Command) -> Ticket {
        let (reply, rx) = oneshot::channel();
        debug!(command = %command, "queued");
        // A closed queue drops the job and with it `reply`, so the ticket
        // resolves to `Aborted`.
        let _ = self.jobs.send(Job { command, reply });
        Ticket { rx }
    }
}

enum Backend {
    /// `None` only if the executor was lost to a panicked blocking task.
    InProcess(Option<InProcessExecutor>),
    Remote(Arc<dyn RemoteExecutor>),
}

impl Backend {
    async fn execute(&mut self, command: &Command) -> Result<CommandOutcome, TerminoError> {
        match self {
            Self::InProcess(slot) => {
                let mut executor = slot.take().ok_or_else(|| {
                    TerminoError::Aborted("in-process executor is unavailable".to_string())
                })?;
                // Reads and writes of the settings file are blocking I/O.
                let command = command.clone();
                let (executor, result) = tokio::task::spawn_blocking(move || {
                    let result = executor.execute(&command);
                    (executor, result)
                })
                .await
                .map_err(|e| TerminoError::Aborted(format!("executor task failed: {e}")))?;
                *slot = Some(executor);
                result.map(CommandOutcome::Completed)
            }
            Self::Remote(remote) => remote.forward(command).await.map(CommandOutcome::Forwarded),
        }
    }
}

/// Owns the queue and its single worker task.
pub struct Dispatcher {
    mode: RunMode,
    handle: DispatcherHandle,
    worker: JoinHandle<WorkerReport>,
    halted: watch::Receiver<Option<String>>,
}

impl Dispatcher {
    /// Apply commands to the local document through `executor`.
    pub fn in_process(executor: InProcessExecutor) -> Self {
        Self::spawn(RunMode::InProcess, Backend::InProcess(Some(executor)))
    }

    /// Forward every command unchanged to `remote`.
    pub fn out_of_process(remote: Arc<dyn RemoteExecutor>) -> Self {
        Self::spawn(RunMode::OutOfProcess, Backend::Remote(remote))
    }

    fn spawn(mode: RunMode, backend: Backend) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let (halt, halted) = watch::channel(None);
        let worker = tokio::spawn(run_worker(backend, rx, halt));
        debug!(%mode, "dispatcher started");
        Self {
            mode,
            handle: DispatcherHandle { jobs },
            worker,
            halted,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Producer handle for other tasks; the worker keeps running until every
    /// handle is dropped and [`Dispatcher::close`] is called.
    pub fn handle(&self) -> DispatcherHandle {
        self.handle.clone()
    }

    pub fn submit(&self, command: Command) -> Ticket {
        self.handle.submit(command)
    }

    /// Resolves with the reason once a fatal error has halted the worker.
    ///
    /// Resolves with `None` if the worker exits without halting.
    pub fn halted(&self) -> impl Future<Output = Option<String>> + Send + 'static {
        let mut halted = self.halted.clone();
        async move {
            match halted.wait_for(Option::is_some).await {
                Ok(reason) => (*reason).clone(),
                Err(_) => None,
            }
        }
    }

    /// Stop accepting commands and wait for the queue to drain.
    pub async fn close(self) -> WorkerReport {
        drop(self.handle);
        match self.worker.await {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "dispatcher worker did not finish");
                WorkerReport {
                    halted: Some(format!("worker task failed: {err}")),
                    ..WorkerReport::default()
                }
            }
        }
    }
}

async fn run_worker(
    mut backend: Backend,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    halt: watch::Sender<Option<String>>,
) -> WorkerReport {
    let mut report = WorkerReport::default();
    while let Some(Job { command, reply }) = jobs.recv().await {
        let result = match &report.halted {
            Some(reason) => Err(TerminoError::Aborted(reason.clone())),
            None => backend.execute(&command).await,
        };
        match &result {
            Ok(outcome) => {
                debug!(command = %command, outcome = %outcome, "done");
                report.succeeded += 1;
            }
            Err(err) if err.is_fatal() => {
                error!(command = %command, error = %err, "halting queue");
                report.halted = Some(format!("an earlier command failed: {err}"));
                report.failed += 1;
            }
            Err(err) => {
                warn!(command = %command, error = %err, "command failed");
                report.failed += 1;
            }
        }
        // The producer may have stopped waiting; the work is done either way.
        let _ = reply.send(result);
        if report.halted.is_some() && halt.borrow().is_none() {
            halt.send_replace(report.halted.clone());
        }
    }
    debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        "dispatcher drained"
    );
    report
}
