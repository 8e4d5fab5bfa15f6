use crate::plugin::PluginFactory;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for resolving service-declared external plugins by name.
///
/// The engine never searches the filesystem or a package registry itself;
/// the CLI layer injects the concrete resolution strategy.
pub trait PluginResolver: Send + Sync {
    /// Resolve a plugin name to a factory, or None if the name is unknown
    fn resolve(&self, name: &str) -> Result<Option<PluginFactory>>;
}

/// Resolver backed by a fixed name-to-factory table
#[derive(Default)]
pub struct StaticPluginResolver {
    factories: RwLock<HashMap<String, PluginFactory>>,
}

impl StaticPluginResolver {
    /// Create a resolver with no known plugins
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under an external plugin name
    #[allow(dead_code)]
    pub fn with(self, name: &str, factory: PluginFactory) -> Self {
        self.factories
            .write()
            .unwrap()
            .insert(name.to_string(), factory);
        self
    }
}

impl PluginResolver for StaticPluginResolver {
    fn resolve(&self, name: &str) -> Result<Option<PluginFactory>> {
        Ok(self.factories.read().unwrap().get(name).cloned())
    }
}
