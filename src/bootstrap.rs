//! One-time process bootstrap seams.
//!
//! # Responsibilities
//! - Carry the embedding application's dependencies opaquely
//!   (`AppContext`) into the one-time init hook
//! - Define the handler-provider seam used to bind the initial handler
//! - Resolve the configured `init-symbol` against named init hooks
//!
//! # Design Decisions
//! - No foreign-runtime symbol resolution: the embedding application
//!   registers named hooks explicitly at startup, and `init-symbol`
//!   selects one of them
//! - An unknown `init-symbol` is a configuration fault, fatal at
//!   construction

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::HandlerRegistry;

/// Opaque capability object passed by reference into the one-time init
/// hook. A type map: at most one value per type.
#[derive(Default)]
pub struct AppContext {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Fetch a previously stored value by type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<T>().ok())
    }
}

/// One-time installation of the embedding application's handler graph.
///
/// Runs exactly once, during [`crate::nrepl::Boost::bootstrap`], before
/// any request is served.
pub trait HandlerProvider: Send + Sync {
    fn install(&self, ctx: &AppContext, registry: &HandlerRegistry);
}

/// A named handler-initialization entry point. Failures abort
/// construction.
pub type InitHook = Arc<dyn Fn(&AppContext) -> Result<(), String> + Send + Sync>;

/// Named init hooks the `init-symbol` config option resolves against.
#[derive(Default)]
pub struct InitHookRegistry {
    hooks: HashMap<String, InitHook>,
}

impl InitHookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, hook: InitHook) {
        self.hooks.insert(name.into(), hook);
    }

    pub fn resolve(&self, name: &str) -> Option<&InitHook> {
        self.hooks.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_round_trip() {
        #[derive(Debug, PartialEq)]
        struct Dep(u32);

        let mut ctx = AppContext::new();
        ctx.insert(Dep(7));
        assert_eq!(*ctx.get::<Dep>().unwrap(), Dep(7));
        assert!(ctx.get::<String>().is_none());
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut ctx = AppContext::new();
        ctx.insert(1u32);
        ctx.insert(2u32);
        assert_eq!(*ctx.get::<u32>().unwrap(), 2);
    }

    #[test]
    fn test_hook_registry_resolution() {
        let mut hooks = InitHookRegistry::new();
        hooks.register("app/init!", Arc::new(|_ctx| Ok(())));
        assert!(hooks.resolve("app/init!").is_some());
        assert!(hooks.resolve("app/other!").is_none());
    }
}
