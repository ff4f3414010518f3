//! Remote-eval (nREPL-style) server lifecycle.
//!
//! # Data Flow
//! ```text
//! POST {root}/start-nrepl
//!     → boost.rs (guarded Stopped → Running transition)
//!     → server.rs (bind port, accept loop, JSON line protocol)
//!
//! POST {root}/stop-nrepl
//!     → boost.rs (guarded Running → Stopped transition)
//!     → server.rs (shutdown broadcast, handle discarded)
//! ```
//!
//! # Design Decisions
//! - At most one running instance per manager
//! - Duplicate transitions are rejected, never silently absorbed
//! - The server binds loopback only; remote eval is a debugging door

pub mod boost;
pub mod server;

pub use boost::{Boost, BootstrapError};
pub use server::{EvalServer, EvalServerHandle, Evaluator, TcpEvalServer};

use thiserror::Error;

/// Errors from eval-server lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// `start()` while already running. State is left untouched.
    #[error("nREPL service already running")]
    AlreadyRunning,

    /// `stop()` while already stopped.
    #[error("nREPL server is already stopped")]
    AlreadyStopped,

    /// The server could not bind or start.
    #[error("could not start nREPL server: {0}")]
    Startup(#[from] std::io::Error),
}
