//! Lifecycle manager for the remote-eval server ("Boost").
//!
//! Holds the run-time state: the eval-server handle is present while
//! running and absent while stopped. Start/stop are serialized by one
//! mutex per manager, so concurrent callers observe whole transitions
//! only.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::bootstrap::{AppContext, HandlerProvider, InitHookRegistry};
use crate::config::schema::BridgeConfig;
use crate::handler::HandlerRegistry;
use crate::nrepl::server::{EvalServer, EvalServerHandle};
use crate::nrepl::LifecycleError;

/// Errors from one-time construction.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// `init-symbol` names an entry point nobody registered.
    #[error("unknown init entry point {0:?}")]
    UnknownInitSymbol(String),

    /// The init hook itself failed.
    #[error("init entry point {name:?} failed: {reason}")]
    InitFailed { name: String, reason: String },

    /// Auto-start failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl std::fmt::Debug for Boost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boost")
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

/// Owns the start/stop state machine of the remote-eval server.
pub struct Boost {
    port: u16,
    eval_server: Arc<dyn EvalServer>,
    server: Mutex<Option<EvalServerHandle>>,
}

impl Boost {
    /// A manager in the `Stopped` state. `port` 0 requests an
    /// ephemeral port on each start.
    pub fn new(port: u16, eval_server: Arc<dyn EvalServer>) -> Self {
        Self {
            port,
            eval_server,
            server: Mutex::new(None),
        }
    }

    /// One-time process bootstrap. Runs exactly once, before any
    /// request is served:
    /// 1. installs the application's handler via `provider`,
    /// 2. resolves and invokes the configured `init-symbol` (if any)
    ///    with the application context,
    /// 3. auto-starts the eval server when `nrepl.start` is true.
    pub async fn bootstrap(
        config: &BridgeConfig,
        eval_server: Arc<dyn EvalServer>,
        registry: &HandlerRegistry,
        provider: &dyn HandlerProvider,
        init_hooks: &InitHookRegistry,
        ctx: &AppContext,
    ) -> Result<Self, BootstrapError> {
        provider.install(ctx, registry);

        if let Some(symbol) = config.bridge.init_symbol.as_deref() {
            tracing::info!(init_symbol = %symbol, "invoking init entry point");
            let hook = init_hooks
                .resolve(symbol)
                .ok_or_else(|| BootstrapError::UnknownInitSymbol(symbol.to_string()))?;
            (**hook)(ctx).map_err(|reason| BootstrapError::InitFailed {
                name: symbol.to_string(),
                reason,
            })?;
        }

        let boost = Self::new(config.nrepl.port, eval_server);
        if config.nrepl.start {
            boost.start().await?;
        }
        Ok(boost)
    }

    /// `Stopped → Running`. Fails with [`LifecycleError::AlreadyRunning`]
    /// if already running; the original handle is untouched.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let mut guard = self.server.lock().await;
        if guard.is_some() {
            return Err(LifecycleError::AlreadyRunning);
        }
        let handle = self.eval_server.start(self.port).await.map_err(|e| {
            tracing::error!(port = self.port, error = %e, "could not start nREPL");
            e
        })?;
        tracing::info!(address = %handle.local_addr(), "nREPL server started");
        *guard = Some(handle);
        Ok(())
    }

    /// `Running → Stopped`. Fails with [`LifecycleError::AlreadyStopped`]
    /// if already stopped.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut guard = self.server.lock().await;
        let handle = guard.take().ok_or(LifecycleError::AlreadyStopped)?;
        self.eval_server.stop(handle).await?;
        tracing::info!("nREPL server stopped");
        Ok(())
    }

    /// True while a server handle is held.
    pub async fn is_running(&self) -> bool {
        self.server.lock().await.is_some()
    }

    /// Bound address of the running server, if any.
    pub async fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.server.lock().await.as_ref().map(|h| h.local_addr())
    }
}
