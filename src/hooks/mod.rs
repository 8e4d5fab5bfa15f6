pub mod registry;

pub use registry::{HookEntry, HookRegistry};

use crate::plugin::{PluginManager, SpawnOptions};
use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Result of one hook execution. `Terminate` gracefully unwinds the
/// remaining lifecycle of the current invocation; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Terminate,
}

pub type HookFuture = BoxFuture<'static, Result<HookOutcome>>;

/// A unit of work contributed by a plugin for one lifecycle event phase.
pub type HookFn = Arc<dyn Fn(HookContext) -> HookFuture + Send + Sync>;

/// Per-invocation context handed to every hook.
#[derive(Clone)]
pub struct HookContext {
    /// The orchestrator running this lifecycle; gives hooks access to
    /// registries, options and spawn.
    pub orchestrator: Arc<PluginManager>,
    /// Nesting depth of the current lifecycle (0 for the CLI-invoked one),
    /// threaded through spawn rather than kept in process-wide state.
    pub depth: usize,
    /// The failure that triggered this hook; set only for `error` hooks.
    pub error: Option<Arc<anyhow::Error>>,
}

impl HookContext {
    /// Current value of a CLI option, after shortcut promotion and defaults.
    pub fn option(&self, name: &str) -> Option<Value> {
        self.orchestrator.option(name)
    }

    /// Run a nested sub-lifecycle. Entrypoint commands are always permitted.
    /// Returns `Terminate` when the options request terminating the calling
    /// lifecycle; the hook propagates that by returning it.
    pub async fn spawn(&self, path: &str, options: SpawnOptions) -> Result<HookOutcome> {
        self.orchestrator
            .clone()
            .spawn_at_depth(path, options, self.depth + 1)
            .await
    }
}

/// Wrap an async closure as a registrable hook.
pub fn hook<F, Fut>(f: F) -> HookFn
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HookOutcome>> + Send + 'static,
{
    Arc::new(move |ctx| -> HookFuture { Box::pin(f(ctx)) })
}
