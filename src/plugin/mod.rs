pub mod builtin;
pub mod lifecycle;
pub mod manager;

pub use lifecycle::SpawnOptions;
pub use manager::PluginManager;

use crate::command::CommandMap;
use crate::config::ServiceConfig;
use crate::hooks::HookFn;
use crate::traits::Output;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// CLI options shared between the executor and hooks. Mutated in place by
/// shortcut promotion and default assignment during invocation; there is no
/// concurrent writer because hook execution is strictly sequential.
pub type SharedOptions = Arc<RwLock<HashMap<String, Value>>>;

/// Utilities handed to every plugin constructor
#[derive(Clone)]
pub struct PluginUtils {
    pub output: Arc<dyn Output>,
}

/// Constructor arguments for every plugin: the orchestrator context (service
/// configuration), the resolved CLI options, and shared utilities.
#[derive(Clone)]
pub struct PluginInit {
    pub config: Arc<ServiceConfig>,
    pub options: SharedOptions,
    pub utils: PluginUtils,
}

/// A loaded plugin. `commands` and `hooks` are read once right after
/// construction; returning `None` means the capability is absent.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Canonical plugin name used in registries and diagnostics
    fn name(&self) -> &'static str;

    /// Provider this plugin is scoped to. A plugin declaring a provider is
    /// skipped entirely when the service targets a different one.
    fn provider(&self) -> Option<&str> {
        None
    }

    /// Commands this plugin contributes to the command tree
    fn commands(&self) -> Option<CommandMap> {
        None
    }

    /// Hooks this plugin attaches to lifecycle events, in declaration order
    fn hooks(&self) -> Option<Vec<(String, HookFn)>> {
        None
    }

    /// Awaited once after all plugins are loaded, in parallel across plugins
    async fn async_init(&self) -> Result<()> {
        Ok(())
    }
}

/// Constructor contract for concrete plugin types
pub trait PluginConstruct: Plugin + Sized {
    fn build(init: PluginInit) -> Result<Self>;

    /// Capability tags consulted by the loader; "build"-tagged external
    /// plugins are loaded before all other external plugins.
    fn tags() -> &'static [&'static str] {
        &[]
    }
}

/// A resolvable plugin constructor carrying its class identity and tags.
/// Duplicate-plugin detection compares `type_id`, not names.
#[derive(Clone)]
pub struct PluginFactory {
    type_id: TypeId,
    class_name: &'static str,
    tags: &'static [&'static str],
    build: Arc<dyn Fn(PluginInit) -> Result<Box<dyn Plugin>> + Send + Sync>,
}

impl PluginFactory {
    pub fn of<P: PluginConstruct + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            class_name: short_type_name::<P>(),
            tags: P::tags(),
            build: Arc::new(|init| Ok(Box::new(P::build(init)?) as Box<dyn Plugin>)),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Unqualified type name, for diagnostics
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    pub fn construct(&self, init: PluginInit) -> Result<Box<dyn Plugin>> {
        (self.build)(init)
    }
}

fn short_type_name<P>() -> &'static str {
    let full = std::any::type_name::<P>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPlugin;

    impl Plugin for NullPlugin {
        fn name(&self) -> &'static str {
            "null"
        }
    }

    impl PluginConstruct for NullPlugin {
        fn build(_init: PluginInit) -> Result<Self> {
            Ok(Self)
        }

        fn tags() -> &'static [&'static str] {
            &["build"]
        }
    }

    #[test]
    fn test_factory_carries_class_identity() {
        let factory = PluginFactory::of::<NullPlugin>();
        assert_eq!(factory.type_id(), TypeId::of::<NullPlugin>());
        assert_eq!(factory.class_name(), "NullPlugin");
        assert!(factory.has_tag("build"));
        assert!(!factory.has_tag("provider"));
    }

    #[test]
    fn test_capabilities_default_to_absent() {
        let plugin = NullPlugin;
        assert!(plugin.provider().is_none());
        assert!(plugin.commands().is_none());
        assert!(plugin.hooks().is_none());
    }
}
