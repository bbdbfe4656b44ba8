//! `termino daemon`: one long-lived in-process dispatcher behind a TCP port.
//!
//! Every accepted connection is a producer. Its requests are answered in the
//! order they arrive, and because all connections share one dispatcher the
//! undo history spans client invocations.
//!
//! A fatal error (the settings file changed underneath the daemon) stops the
//! daemon: its document and history are stale, and later clients must not
//! be answered from them.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::dispatch::{
    Dispatcher, DispatcherHandle, InProcessExecutor, RemoteReply, RemoteRequest, ReplyStatus,
    WorkerReport,
};
use crate::error::TerminoError;

/// How long connected clients get to read their last replies after a halt.
const HALT_GRACE: Duration = Duration::from_secs(2);

pub struct Daemon {
    listener: TcpListener,
    dispatcher: Dispatcher,
}

impl Daemon {
    /// Bind `address` and start the dispatcher that will own the document.
    pub async fn bind(address: &str, executor: InProcessExecutor) -> Result<Self, TerminoError> {
        let listener = TcpListener::bind(address).await?;
        info!(
            address = %listener.local_addr()?,
            settings = %executor.path().display(),
            "daemon listening"
        );
        Ok(Self {
            listener,
            dispatcher: Dispatcher::in_process(executor),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TerminoError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves or the dispatcher halts,
    /// then drain the queue. A halt shows up as [`WorkerReport::halted`].
    pub async fn serve_until<F>(self, shutdown: F) -> WorkerReport
    where
        F: Future<Output = ()>,
    {
        let Self {
            listener,
            dispatcher,
        } = self;
        let mut connections = JoinSet::new();
        let halted = dispatcher.halted();
        tokio::pin!(shutdown);
        tokio::pin!(halted);
        let mut halting = false;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                reason = &mut halted => {
                    error!(
                        reason = reason.as_deref().unwrap_or("dispatcher stopped"),
                        "daemon stopping"
                    );
                    halting = true;
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "client connected");
                        connections.spawn(serve_connection(stream, dispatcher.handle()));
                    }
                    Err(err) => warn!(error = %err, "accept failed"),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }
        info!("daemon shutting down");
        drop(listener);
        if halting {
            // Let the client that hit the conflict read its reply.
            let drained = timeout(HALT_GRACE, async {
                while connections.join_next().await.is_some() {}
            })
            .await;
            if drained.is_err() {
                debug!("closing lingering connections");
            }
        }
        connections.shutdown().await;
        dispatcher.close().await
    }
}

async fn serve_connection(stream: TcpStream, dispatcher: DispatcherHandle) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "reading request failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<RemoteRequest>(&line) {
            Ok(request) => {
                let result = dispatcher.submit(request.command).outcome().await;
                RemoteReply::from_result(request.id, &result)
            }
            Err(err) => RemoteReply {
                id: 0,
                status: ReplyStatus::Error {
                    kind: "transport".to_string(),
                    message: format!("malformed request: {err}"),
                },
            },
        };
        let mut text = match serde_json::to_string(&reply) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "encoding reply failed");
                break;
            }
        };
        text.push('\n');
        if let Err(err) = writer.write_all(text.as_bytes()).await {
            warn!(error = %err, "writing reply failed");
            break;
        }
    }
    debug!("client disconnected");
}
