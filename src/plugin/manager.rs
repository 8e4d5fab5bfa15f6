use crate::command::{AliasTable, CommandNode, CommandTree, PublicCommand};
use crate::config::ServiceConfig;
use crate::error::EngineError;
use crate::hooks::HookRegistry;
use crate::plugin::builtin;
use crate::plugin::{PluginFactory, PluginInit, PluginUtils, SharedOptions};
use crate::traits::{Output, PluginResolver};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// External plugin names known to conflict with the built-in bundler.
/// Loading one of these while built-in bundling is active would bundle
/// artifacts twice, so registration fails instead.
const LEGACY_BUNDLER_PLUGINS: [&str; 3] = [
    "skylift-esbuild",
    "skylift-webpack",
    "skylift-plugin-typescript",
];

/// A registered plugin with its identities
#[allow(dead_code)]
pub struct LoadedPlugin {
    /// Canonical name reported by the plugin itself
    pub name: String,
    /// Name the service declared it under, for external plugins
    pub external_name: Option<String>,
    pub plugin: Arc<dyn crate::plugin::Plugin>,
}

/// Owns the plugin instances and the registries they populate.
///
/// Registries are built once during the load phase (`&mut self`), then the
/// manager is wrapped in `Arc` and treated as read-only for the invoke
/// phase; the CLI options map is the single mutable exception.
pub struct PluginManager {
    pub(crate) config: Arc<ServiceConfig>,
    pub(crate) options: SharedOptions,
    pub(crate) output: Arc<dyn Output>,
    pub(crate) command_tree: CommandTree,
    pub(crate) alias_table: AliasTable,
    pub(crate) hook_registry: HookRegistry,
    pub(crate) plugins: Vec<LoadedPlugin>,
    pub(crate) registered_types: HashSet<TypeId>,
    pub(crate) run_start_time: RwLock<Option<DateTime<Utc>>>,
}

impl PluginManager {
    pub fn new(
        config: ServiceConfig,
        cli_options: HashMap<String, Value>,
        output: Arc<dyn Output>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            options: Arc::new(RwLock::new(cli_options)),
            output,
            command_tree: CommandTree::new(),
            alias_table: AliasTable::new(),
            hook_registry: HookRegistry::new(),
            plugins: Vec::new(),
            registered_types: HashSet::new(),
            run_start_time: RwLock::new(None),
        }
    }

    /// Load built-in plugins in their fixed order, then the service-declared
    /// external plugins. Plugin-registration order is exactly hook execution
    /// order within any given event.
    pub fn load_all_plugins(&mut self, resolver: &dyn PluginResolver) -> Result<()> {
        for factory in builtin::builtin_plugins() {
            self.add_plugin(factory, None)?;
        }

        let external = self.resolve_external_plugins(resolver)?;
        for (name, factory) in order_external_plugins(external) {
            self.add_plugin(factory, Some(name))?;
        }

        Ok(())
    }

    /// Resolve every service-declared plugin name through the injected
    /// resolver, failing on the first name that cannot be resolved.
    fn resolve_external_plugins(
        &self,
        resolver: &dyn PluginResolver,
    ) -> Result<Vec<(String, PluginFactory)>> {
        let mut resolved = Vec::new();

        for name in self.config.declared_plugins() {
            if self.config.bundler_enabled() && LEGACY_BUNDLER_PLUGINS.contains(&name.as_str()) {
                return Err(EngineError::LegacyBundlerConflict(name.clone()).into());
            }

            match resolver.resolve(name)? {
                Some(factory) => resolved.push((name.clone(), factory)),
                None => return Err(EngineError::PluginNotFound(name.clone()).into()),
            }
        }

        Ok(resolved)
    }

    /// Instantiate one plugin and merge its commands and hooks into the
    /// registries. Returns false when the plugin was skipped for provider
    /// incompatibility.
    pub fn add_plugin(
        &mut self,
        factory: PluginFactory,
        external_name: Option<String>,
    ) -> Result<bool> {
        let init = PluginInit {
            config: self.config.clone(),
            options: self.options.clone(),
            utils: PluginUtils {
                output: self.output.clone(),
            },
        };
        let instance = factory.construct(init)?;

        if let Some(provider) = instance.provider() {
            if self.config.provider_name() != Some(provider) {
                return Ok(false);
            }
        }

        if !self.registered_types.insert(factory.type_id()) {
            return Err(
                EngineError::DuplicatePluginDefinition(factory.class_name().to_string()).into(),
            );
        }

        let instance: Arc<dyn crate::plugin::Plugin> = Arc::from(instance);

        if let Some(commands) = instance.commands() {
            for (name, details) in &commands {
                self.command_tree
                    .register(instance.name(), name, details, &mut self.alias_table)?;
            }
        }

        if let Some(hooks) = instance.hooks() {
            self.hook_registry
                .register_hooks(instance.name(), hooks, self.output.as_ref());
        }

        self.plugins.push(LoadedPlugin {
            name: instance.name().to_string(),
            external_name,
            plugin: instance,
        });

        Ok(true)
    }

    /// Await every plugin's async initialization, in parallel. A single
    /// failure aborts the load; the engine does not run with a partially
    /// initialized plugin set.
    pub async fn async_init_all(&self) -> Result<()> {
        futures::future::try_join_all(self.plugins.iter().map(|p| p.plugin.async_init())).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Orchestrator API consumed by plugins
    // ------------------------------------------------------------------

    /// Public command listing: entrypoints pruned, aliases flattened
    pub fn commands(&self) -> BTreeMap<String, PublicCommand> {
        self.command_tree.public_commands(&self.alias_table)
    }

    /// Resolve a command path, following aliases
    pub fn get_command(
        &self,
        segments: &[String],
        allow_entrypoints: bool,
    ) -> Result<&CommandNode, EngineError> {
        self.command_tree
            .get(segments, &self.alias_table, allow_entrypoints)
    }

    #[allow(dead_code)]
    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current value of a CLI option
    pub fn option(&self, name: &str) -> Option<Value> {
        self.options.read().unwrap().get(name).cloned()
    }

    /// Timestamp of the current `run` call, set once per run
    pub fn command_run_start_time(&self) -> Option<DateTime<Utc>> {
        *self.run_start_time.read().unwrap()
    }
}

/// Stable partition: "build"-capability plugins first, relative order within
/// each partition preserved.
fn order_external_plugins(
    factories: Vec<(String, PluginFactory)>,
) -> Vec<(String, PluginFactory)> {
    let (build, rest): (Vec<_>, Vec<_>) = factories
        .into_iter()
        .partition(|(_, factory)| factory.has_tag("build"));

    build.into_iter().chain(rest).collect()
}
