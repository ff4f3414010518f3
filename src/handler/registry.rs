//! Atomically rebindable handler reference.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{Handler, NotFoundHandler};

/// Shared, rebindable reference to the current dynamic handler.
///
/// Readers observe a fully-published handler via an atomic load; no
/// per-request locking. `Box` keeps the swapped pointer thin so the
/// trait object can be exchanged atomically.
pub struct HandlerRegistry {
    current: ArcSwap<Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// A registry bound to the default 404 handler.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Box::new(NotFoundHandler) as Box<dyn Handler>),
        }
    }

    /// The handler requests currently dispatch to.
    pub fn current(&self) -> Arc<Box<dyn Handler>> {
        self.current.load_full()
    }

    /// Publish a new handler. Takes effect for all subsequent requests;
    /// in-flight requests keep the handler they loaded.
    pub fn set(&self, handler: Box<dyn Handler>) {
        self.current.store(Arc::new(handler));
        tracing::info!("dynamic handler rebound");
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
