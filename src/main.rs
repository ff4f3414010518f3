//! Reference binary for the bridge.
//!
//! Wires the subsystems together the way an embedding application
//! would: a handler provider installing an echo handler, an empty init
//! hook registry, a disabled evaluator behind the nREPL endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ring_bridge::bootstrap::{AppContext, HandlerProvider, InitHookRegistry};
use ring_bridge::config::{load_config, BridgeConfig};
use ring_bridge::handler::{HandlerError, HandlerRegistry};
use ring_bridge::lifecycle::{trigger_on_ctrl_c, Shutdown};
use ring_bridge::nrepl::{Boost, TcpEvalServer};
use ring_bridge::ring::{KwValue, NormalizedRequest, NormalizedResponse};
use ring_bridge::HttpServer;

#[derive(Parser)]
#[command(name = "ring-bridge", about = "Ring-style HTTP bridge")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn echo(request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
    Ok(NormalizedResponse::new(200).with_body(KwValue::map([
        ("method", KwValue::from(request.method.as_str())),
        ("uri", KwValue::from(request.uri)),
        ("has-body", KwValue::from(request.body.is_some())),
    ])))
}

/// Installs the echo handler. An embedding application would bind its
/// own component graph here.
struct EchoProvider;

impl HandlerProvider for EchoProvider {
    fn install(&self, _ctx: &AppContext, registry: &HandlerRegistry) {
        registry.set(Box::new(echo));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "ring_bridge={},tower_http=debug",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        root_path = %config.bridge.root_path,
        ws_path = %config.bridge.ws_path,
        nrepl_port = config.nrepl.port,
        nrepl_start = config.nrepl.start,
        "configuration loaded"
    );

    let registry = Arc::new(HandlerRegistry::new());
    let mut ctx = AppContext::new();
    ctx.insert(config.clone());

    let boost = Arc::new(
        Boost::bootstrap(
            &config,
            Arc::new(TcpEvalServer::disabled()),
            &registry,
            &EchoProvider,
            &InitHookRegistry::new(),
            &ctx,
        )
        .await?,
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    trigger_on_ctrl_c(shutdown.clone());

    let server = HttpServer::new(&config, registry, boost);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
