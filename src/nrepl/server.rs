//! Remote-eval server implementation.
//!
//! # Responsibilities
//! - Bind the configured port and accept client sessions
//! - Speak a newline-delimited JSON op protocol (eval, describe)
//! - Delegate evaluation to a pluggable evaluator
//!
//! # Design Decisions
//! - Loopback bind only
//! - Sessions end on client close or shutdown broadcast
//! - Protocol errors answer the offending line; they never kill the
//!   accept loop

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::nrepl::LifecycleError;

/// Evaluates a code form, returning its printed value or an error
/// message.
pub type Evaluator = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// Opaque handle to a running eval server. Present while running,
/// discarded on stop.
pub struct EvalServerHandle {
    addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

impl EvalServerHandle {
    /// The address the server actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

/// A remote-eval server that can be started on a port and stopped via
/// its handle.
#[async_trait]
pub trait EvalServer: Send + Sync {
    async fn start(&self, port: u16) -> Result<EvalServerHandle, LifecycleError>;
    async fn stop(&self, handle: EvalServerHandle) -> Result<(), LifecycleError>;
}

/// Default eval server: TCP, one JSON document per line.
///
/// Requests look like `{"op":"eval","code":"..."}` and are answered
/// with `{"status":"done","value":...}` or
/// `{"status":"error","err":...}`. `{"op":"describe"}` lists the
/// supported ops.
pub struct TcpEvalServer {
    evaluator: Evaluator,
}

impl TcpEvalServer {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// A server that accepts sessions but refuses evaluation. Useful
    /// when the embedding application installs no evaluator.
    pub fn disabled() -> Self {
        Self::new(Arc::new(|_code| Err("no evaluator installed".to_string())))
    }
}

impl Default for TcpEvalServer {
    fn default() -> Self {
        Self::disabled()
    }
}

#[async_trait]
impl EvalServer for TcpEvalServer {
    async fn start(&self, port: u16) -> Result<EvalServerHandle, LifecycleError> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;

        let shutdown = Shutdown::new();
        let mut shutdown_rx = shutdown.subscribe();
        let session_shutdown = shutdown.clone();
        let evaluator = self.evaluator.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    accepted = listener.accept() => {
                        match accepted {
                            Ok((socket, peer)) => {
                                tracing::debug!(peer = %peer, "eval session opened");
                                let evaluator = evaluator.clone();
                                let session_rx = session_shutdown.subscribe();
                                tokio::spawn(async move {
                                    if let Err(e) = run_session(socket, evaluator, session_rx).await {
                                        tracing::debug!(peer = %peer, error = %e, "eval session ended");
                                    }
                                });
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "eval accept failed");
                            }
                        }
                    }
                }
            }
            tracing::debug!(address = %addr, "eval accept loop stopped");
        });

        Ok(EvalServerHandle { addr, shutdown, task })
    }

    async fn stop(&self, handle: EvalServerHandle) -> Result<(), LifecycleError> {
        // Every session subscribed to the same broadcast; this closes
        // the accept loop and all live sessions.
        handle.shutdown.trigger();
        let _ = handle.task.await;
        Ok(())
    }
}

#[derive(Deserialize)]
struct OpRequest {
    op: String,
    #[serde(default)]
    code: String,
}

async fn run_session(
    socket: TcpStream,
    evaluator: Evaluator,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        // Biased so a pending shutdown always wins over a pending line.
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = match serde_json::from_str::<OpRequest>(&line) {
                    Ok(request) => dispatch_op(&request, &evaluator),
                    Err(e) => json!({"status": "error", "err": format!("malformed request: {e}")}),
                };
                let mut out = reply.to_string();
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
            }
        }
    }
    Ok(())
}

fn dispatch_op(request: &OpRequest, evaluator: &Evaluator) -> serde_json::Value {
    match request.op.as_str() {
        "eval" => match (**evaluator)(&request.code) {
            Ok(value) => json!({"status": "done", "value": value}),
            Err(err) => json!({"status": "error", "err": err}),
        },
        "describe" => json!({"status": "done", "ops": ["describe", "eval"]}),
        other => json!({"status": "unknown-op", "op": other}),
    }
}
