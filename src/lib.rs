//! Ring-style HTTP bridge with a rebindable dynamic handler and an
//! nREPL-like remote-eval server lifecycle.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request      ┌─────────────────────────────────────────────┐
//!   ───────────────────▶│  http::server (axum router, root prefix)    │
//!                       │        │                                     │
//!                       │        ▼                                     │
//!                       │  http::bridge (native → NormalizedRequest)   │
//!                       │        │                                     │
//!                       │        ▼                                     │
//!                       │  handler::HandlerRegistry (atomic load)      │
//!                       │        │                                     │
//!                       │        ▼                                     │
//!   Client Response ◀───│  ring::NormalizedResponse → native response  │
//!                       └─────────────────────────────────────────────┘
//!
//!   POST {root}/start-nrepl ──▶ nrepl::Boost::start ──▶ eval server
//!   POST {root}/stop-nrepl  ──▶ nrepl::Boost::stop
//! ```
//!
//! The bridge never retries and never masks handler errors; lifecycle
//! conflicts surface as HTTP 409 with a minimal JSON body.

// Core subsystems
pub mod config;
pub mod handler;
pub mod http;
pub mod nrepl;
pub mod ring;

// Cross-cutting concerns
pub mod bootstrap;
pub mod lifecycle;

pub use config::schema::BridgeConfig;
pub use handler::{Handler, HandlerError, HandlerRegistry};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use nrepl::Boost;
pub use ring::{NormalizedRequest, NormalizedResponse};
