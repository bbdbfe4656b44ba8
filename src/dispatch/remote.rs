//! Forwarding commands to a daemon.
//!
//! Wire protocol: one JSON object per line in each direction.
//!
//! ```text
//! -> {"id":1,"command":{"kind":"undo","info":{...},"count":1}}
//! <- {"id":1,"status":"ok","summary":"undid 1 command(s)"}
//! <- {"id":1,"status":"error","kind":"not-found","message":"no profile matches position 7"}
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::TerminoError;

/// Acknowledgement from the side that executed a forwarded command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAck {
    pub summary: String,
}

/// Something that executes commands on our behalf.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn forward(&self, command: &Command) -> Result<RemoteAck, TerminoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRequest {
    pub id: u64,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReply {
    pub id: u64,
    #[serde(flatten)]
    pub status: ReplyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ReplyStatus {
    Ok { summary: String },
    /// `kind` is [`TerminoError::kind`] of the failure.
    Error { kind: String, message: String },
}

impl RemoteReply {
    pub fn from_result<T: std::fmt::Display>(id: u64, result: &Result<T, TerminoError>) -> Self {
        let status = match result {
            Ok(done) => ReplyStatus::Ok {
                summary: done.to_string(),
            },
            Err(err) => ReplyStatus::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        };
        Self { id, status }
    }

    /// Turn the reply back into a local result.
    ///
    /// Conflicts and aborts keep their meaning so a halted daemon also halts
    /// the forwarding queue; everything else becomes [`TerminoError::Remote`].
    pub fn into_result(self) -> Result<RemoteAck, TerminoError> {
        match self.status {
            ReplyStatus::Ok { summary } => Ok(RemoteAck { summary }),
            ReplyStatus::Error { kind, message } => Err(match kind.as_str() {
                "concurrency" => TerminoError::Concurrency(message),
                "aborted" => TerminoError::Aborted(message),
                _ => TerminoError::Remote(message),
            }),
        }
    }
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// Newline-delimited JSON client for `termino daemon`.
///
/// Connects lazily and keeps the connection for later commands; a transport
/// failure drops it so the next command reconnects.
pub struct TcpRemoteExecutor {
    address: String,
    timeout: Duration,
    next_id: AtomicU64,
    connection: Mutex<Option<Connection>>,
}

impl TcpRemoteExecutor {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            next_id: AtomicU64::new(1),
            connection: Mutex::new(None),
        }
    }

    async fn connect(&self) -> Result<Connection, TerminoError> {
        let stream = timeout(self.timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| self.timed_out("connecting"))?
            .map_err(|e| {
                TerminoError::Transport(format!(
                    "cannot reach daemon at {}: {e} (is `termino daemon` running?)",
                    self.address
                ))
            })?;
        debug!(address = %self.address, "connected to daemon");
        let (reader, writer) = stream.into_split();
        Ok(Connection {
            reader: BufReader::new(reader),
            writer,
        })
    }

    async fn round_trip(
        &self,
        connection: &mut Connection,
        request: &RemoteRequest,
    ) -> Result<RemoteReply, TerminoError> {
        let mut line = serde_json::to_string(request)
            .map_err(|e| TerminoError::Transport(format!("encoding request: {e}")))?;
        line.push('\n');
        timeout(self.timeout, connection.writer.write_all(line.as_bytes()))
            .await
            .map_err(|_| self.timed_out("sending"))?
            .map_err(|e| TerminoError::Transport(format!("sending request: {e}")))?;

        let mut response = String::new();
        let read = timeout(self.timeout, connection.reader.read_line(&mut response))
            .await
            .map_err(|_| self.timed_out("waiting for a reply"))?
            .map_err(|e| TerminoError::Transport(format!("reading reply: {e}")))?;
        if read == 0 {
            return Err(TerminoError::Transport(
                "daemon closed the connection".to_string(),
            ));
        }
        let reply: RemoteReply = serde_json::from_str(response.trim_end())
            .map_err(|e| TerminoError::Transport(format!("malformed reply: {e}")))?;
        if reply.id != request.id {
            return Err(TerminoError::Transport(format!(
                "reply for request {} arrived while waiting for {}",
                reply.id, request.id
            )));
        }
        Ok(reply)
    }

    fn timed_out(&self, what: &str) -> TerminoError {
        TerminoError::Transport(format!(
            "timed out after {}s {what} ({})",
            self.timeout.as_secs(),
            self.address
        ))
    }
}

#[async_trait]
impl RemoteExecutor for TcpRemoteExecutor {
    async fn forward(&self, command: &Command) -> Result<RemoteAck, TerminoError> {
        let request = RemoteRequest {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            command: command.clone(),
        };
        let mut slot = self.connection.lock().await;
        let mut connection = match slot.take() {
            Some(connection) => connection,
            None => self.connect().await?,
        };
        match self.round_trip(&mut connection, &request).await {
            Ok(reply) => {
                *slot = Some(connection);
                reply.into_result()
            }
            Err(err) => {
                warn!(address = %self.address, error = %err, "dropping daemon connection");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandInfo;
    use crate::error::NotFound;
    use tokio::net::TcpListener;

    fn undo() -> Command {
        Command::undo(2).expect("count")
    }

    #[test]
    fn reply_wire_shape() {
        let ok = RemoteReply::from_result::<String>(3, &Ok("undid 2 command(s)".to_string()));
        assert_eq!(
            serde_json::to_string(&ok).expect("json"),
            r#"{"id":3,"status":"ok","summary":"undid 2 command(s)"}"#
        );

        let err = RemoteReply::from_result::<String>(
            4,
            &Err(NotFound::Profile("position 7".to_string()).into()),
        );
        assert_eq!(
            serde_json::to_string(&err).expect("json"),
            r#"{"id":4,"status":"error","kind":"not-found","message":"no profile matches position 7"}"#
        );
    }

    #[test]
    fn reply_errors_keep_fatal_kinds() {
        let reply = RemoteReply {
            id: 1,
            status: ReplyStatus::Error {
                kind: "concurrency".to_string(),
                message: "changed".to_string(),
            },
        };
        assert!(reply.into_result().expect_err("error").is_fatal());

        let reply = RemoteReply {
            id: 1,
            status: ReplyStatus::Error {
                kind: "not-found".to_string(),
                message: "no profile matches position 7".to_string(),
            },
        };
        let err = reply.into_result().expect_err("error");
        assert_eq!(err.to_string(), "daemon: no profile matches position 7");
    }

    #[test]
    fn request_round_trips_through_json() {
        let request = RemoteRequest {
            id: 9,
            command: Command::composite(CommandInfo::new("set", "atomic"), vec![undo()]),
        };
        let text = serde_json::to_string(&request).expect("json");
        let back: RemoteRequest = serde_json::from_str(&text).expect("parse");
        assert_eq!(back, request);
    }

    #[tokio::test]
    async fn forwards_over_tcp_and_reuses_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("addr").to_string();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let (reader, mut writer) = stream.into_split();
            let mut lines = BufReader::new(reader).lines();
            let mut kinds = Vec::new();
            while let Some(line) = lines.next_line().await.expect("line") {
                let request: RemoteRequest = serde_json::from_str(&line).expect("request");
                kinds.push(request.command.name().to_string());
                let reply = RemoteReply::from_result::<String>(request.id, &Ok("ok".to_string()));
                let mut text = serde_json::to_string(&reply).expect("json");
                text.push('\n');
                writer.write_all(text.as_bytes()).await.expect("write");
            }
            kinds
        });

        let client = TcpRemoteExecutor::new(address, Duration::from_secs(5));
        for _ in 0..2 {
            let ack = client.forward(&undo()).await.expect("forward");
            assert_eq!(ack.summary, "ok");
        }
        drop(client);
        assert_eq!(server.await.expect("server"), vec!["undo", "undo"]);
    }

    #[tokio::test]
    async fn unreachable_daemon_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("addr").to_string();
        drop(listener);
        let client = TcpRemoteExecutor::new(address, Duration::from_secs(2));
        let err = client.forward(&undo()).await.expect_err("nobody listening");
        assert!(matches!(err, TerminoError::Transport(_)));
    }
}
