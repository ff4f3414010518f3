//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (axum router: admin routes, then catch-all)
//!     → bridge.rs (root prefix strip, normalization, dispatch)
//!     → handler registry (atomic load, synchronous invoke)
//!     → bridge.rs (normalized → native response)
//! ```

pub mod bridge;
pub mod server;

pub use bridge::BridgeError;
pub use server::{AppState, HttpServer};
