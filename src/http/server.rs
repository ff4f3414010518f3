//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the axum Router honoring the path contract
//! - Wire up middleware (tracing)
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - The two administrative routes are exact matches; axum checks them
//!   before the catch-all, which subsumes them by prefix
//! - AppState carries only shared-by-Arc pieces; cloning is cheap

use std::sync::Arc;

use axum::{
    routing::{any, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::schema::BridgeConfig;
use crate::handler::HandlerRegistry;
use crate::nrepl::Boost;

use super::bridge::{bridge_handler, start_nrepl_handler, stop_nrepl_handler};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HandlerRegistry>,
    pub boost: Arc<Boost>,
    pub root_path: Arc<str>,
}

/// HTTP server for the bridge.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server from configuration and the shared subsystems.
    pub fn new(config: &BridgeConfig, registry: Arc<HandlerRegistry>, boost: Arc<Boost>) -> Self {
        let state = AppState {
            registry,
            boost,
            root_path: Arc::from(config.bridge.root_path.as_str()),
        };
        Self {
            router: Self::build_router(&config.bridge.root_path, state),
        }
    }

    /// Build the axum router. Administrative routes first, then the
    /// catch-all under the same root.
    fn build_router(root_path: &str, state: AppState) -> Router {
        let expanded = |suffix: &str| format!("{root_path}{suffix}");
        // The root itself has no `{*path}` segment and needs its own route.
        let bare_root = if root_path.is_empty() { "/".to_string() } else { root_path.to_string() };

        // Non-POST methods on the administrative paths fall through to
        // the bridge, like any other path under the root.
        Router::new()
            .route(
                &expanded("/stop-nrepl"),
                post(stop_nrepl_handler).fallback(bridge_handler),
            )
            .route(
                &expanded("/start-nrepl"),
                post(start_nrepl_handler).fallback(bridge_handler),
            )
            .route(&expanded("/{*path}"), any(bridge_handler))
            .route(&bare_root, any(bridge_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
