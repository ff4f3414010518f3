//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Keys are kebab-case on disk (`root-path`, `bind-address`, ...).

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct BridgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route mounting and one-time init settings.
    pub bridge: RoutingConfig,

    /// Remote-eval (nREPL) server settings.
    pub nrepl: NreplConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route mounting configuration. Immutable for the process lifetime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RoutingConfig {
    /// Prefix under which all managed routes are mounted, stripped
    /// before normalization. Empty means mounted at "/".
    pub root_path: String,

    /// WebSocket path. Reserved; carried through but not exercised.
    pub ws_path: String,

    /// Optional name of a handler-initialization entry point, resolved
    /// against the embedding application's init hook registry and
    /// invoked once at construction with the application context.
    pub init_symbol: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            ws_path: "/ws".to_string(),
            init_symbol: None,
        }
    }
}

/// Remote-eval server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NreplConfig {
    /// Bind port for the eval server. 0 requests an ephemeral port.
    pub port: u16,

    /// Start the eval server at construction.
    pub start: bool,
}

impl Default for NreplConfig {
    fn default() -> Self {
        Self {
            port: 7888,
            start: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
