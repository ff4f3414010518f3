//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;

use ring_bridge::config::BridgeConfig;
use ring_bridge::handler::{Handler, HandlerError, HandlerRegistry};
use ring_bridge::lifecycle::Shutdown;
use ring_bridge::nrepl::{Boost, TcpEvalServer};
use ring_bridge::ring::{NormalizedRequest, NormalizedResponse};
use ring_bridge::HttpServer;

/// Records every request it sees and answers with a fixed response.
#[derive(Clone)]
pub struct RecordingHandler {
    seen: Arc<Mutex<Vec<NormalizedRequest>>>,
    response: NormalizedResponse,
}

impl RecordingHandler {
    pub fn new(response: NormalizedResponse) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            response,
        }
    }

    pub fn last_request(&self) -> Option<NormalizedRequest> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Handler for RecordingHandler {
    fn handle(&self, request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Always fails; exercises the unmasked handler error path.
#[allow(dead_code)]
pub struct FailingHandler;

impl Handler for FailingHandler {
    fn handle(&self, _request: NormalizedRequest) -> Result<NormalizedResponse, HandlerError> {
        Err(HandlerError::new("boom"))
    }
}

/// Start a bridge server on an ephemeral port with the given root path
/// and handler. The eval server uses an ephemeral port too.
pub async fn spawn_bridge(root_path: &str, handler: Box<dyn Handler>) -> (SocketAddr, Shutdown) {
    let mut config = BridgeConfig::default();
    config.bridge.root_path = root_path.to_string();
    config.nrepl.port = 0;

    let registry = Arc::new(HandlerRegistry::new());
    registry.set(handler);
    let boost = Arc::new(Boost::new(0, Arc::new(TcpEvalServer::disabled())));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, registry, boost);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
