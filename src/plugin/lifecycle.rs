use crate::command::{CommandNode, CommandType, ServiceDependencyMode};
use crate::error::EngineError;
use crate::hooks::{HookContext, HookOutcome};
use crate::plugin::PluginManager;
use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Options for spawning a nested sub-lifecycle from a hook
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnOptions {
    /// Terminate the calling command's remaining lifecycle once the spawned
    /// lifecycle completes. The spawning hook propagates the returned
    /// `Terminate` outcome by returning it.
    pub terminate_lifecycle_after_execution: bool,
}

/// Self-management command that runs without `initialize` hooks, so plugin
/// management stays usable with a misbehaving plugin set
const SELF_MANAGEMENT_COMMAND: &str = "plugin";

impl PluginManager {
    /// Top-level driver for one CLI invocation.
    ///
    /// Runs `initialize` hooks (unless the target is the self-management
    /// command), invokes the command, then routes any failure through the
    /// `error` hooks and always runs the `finalize` hooks. A failing
    /// `error` hook is logged and swallowed; a failing `finalize` hook
    /// replaces whatever failure was pending.
    pub async fn run(self: Arc<Self>, segments: &[String]) -> Result<()> {
        *self.run_start_time.write().unwrap() = Some(Utc::now());

        if segments.first().map(String::as_str) != Some(SELF_MANAGEMENT_COMMAND) {
            self.clone().run_bare_hooks("initialize").await?;
        }

        let pending = match self.clone().invoke_at_depth(segments, false, 0).await {
            Ok(()) => None,
            Err(error) => {
                let shared = Arc::new(error);
                self.clone().run_error_hooks(shared.clone()).await;
                Some(shared)
            }
        };

        self.run_bare_hooks("finalize").await?;

        match pending {
            None => Ok(()),
            Some(shared) => match Arc::try_unwrap(shared) {
                Ok(original) => Err(original),
                // An error hook retained the failure; re-raise its rendering
                Err(still_shared) => Err(anyhow::anyhow!("{still_shared:#}")),
            },
        }
    }

    /// Resolve and execute one command's full lifecycle.
    #[allow(dead_code)]
    pub async fn invoke(
        self: Arc<Self>,
        segments: &[String],
        allow_entrypoints: bool,
    ) -> Result<()> {
        self.invoke_at_depth(segments, allow_entrypoints, 0).await
    }

    /// Run a nested sub-lifecycle on behalf of a plugin. Entrypoint commands
    /// are always permitted here.
    #[allow(dead_code)]
    pub async fn spawn(self: Arc<Self>, path: &str, options: SpawnOptions) -> Result<HookOutcome> {
        self.spawn_at_depth(path, options, 0).await
    }

    pub(crate) async fn spawn_at_depth(
        self: Arc<Self>,
        path: &str,
        options: SpawnOptions,
        depth: usize,
    ) -> Result<HookOutcome> {
        let segments: Vec<String> = path.split(':').map(str::to_string).collect();
        self.invoke_at_depth(&segments, true, depth).await?;

        if options.terminate_lifecycle_after_execution {
            Ok(HookOutcome::Terminate)
        } else {
            Ok(HookOutcome::Continue)
        }
    }

    async fn invoke_at_depth(
        self: Arc<Self>,
        segments: &[String],
        allow_entrypoints: bool,
        depth: usize,
    ) -> Result<()> {
        let command = self.get_command(segments, allow_entrypoints)?.clone();

        if command.command_type == CommandType::Container {
            crate::cli::print_container_help(&command, self.output.as_ref());
            return Ok(());
        }

        self.promote_shortcuts(&command);
        self.validate_service_dependency(&command)?;
        self.apply_option_defaults(&command);
        self.validate_required_options(&command)?;

        let verbose = matches!(self.option("verbose"), Some(Value::Bool(true)));

        // before -> at -> after per event, each hook awaited to completion
        // before the next; a Terminate outcome abandons everything remaining
        'events: for event in &command.lifecycle_events {
            for phase in ["before:", "", "after:"] {
                let qualified = format!("{phase}{}:{event}", command.key);

                for entry in self.hook_registry.hooks_for(&qualified) {
                    if verbose {
                        let indent = "  ".repeat(depth);
                        self.output.dimmed(&format!(
                            "{indent}Running \"{qualified}\" hook of plugin \"{}\"",
                            entry.plugin_name
                        ));
                    }

                    let ctx = HookContext {
                        orchestrator: self.clone(),
                        depth,
                        error: None,
                    };

                    if (entry.hook)(ctx).await? == HookOutcome::Terminate {
                        break 'events;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run the hooks of a bare (command-independent) event such as
    /// `initialize` or `finalize`.
    async fn run_bare_hooks(self: Arc<Self>, event: &str) -> Result<()> {
        for entry in self.hook_registry.hooks_for(event) {
            let ctx = HookContext {
                orchestrator: self.clone(),
                depth: 0,
                error: None,
            };

            if (entry.hook)(ctx).await? == HookOutcome::Terminate {
                break;
            }
        }

        Ok(())
    }

    /// Notify `error` hooks of a failure. Their own failures are logged as
    /// warnings and never replace the failure being propagated.
    async fn run_error_hooks(self: Arc<Self>, error: Arc<anyhow::Error>) {
        for entry in self.hook_registry.hooks_for("error") {
            let ctx = HookContext {
                orchestrator: self.clone(),
                depth: 0,
                error: Some(error.clone()),
            };

            if let Err(hook_error) = (entry.hook)(ctx).await {
                self.output
                    .warning(&format!("An \"error\" hook failed: {hook_error:#}"));
            }
        }
    }

    fn promote_shortcuts(&self, command: &CommandNode) {
        let mut options = self.options.write().unwrap();

        for (name, spec) in &command.options {
            if let Some(shortcut) = &spec.shortcut {
                if let Some(value) = options.get(shortcut).cloned() {
                    options.insert(name.clone(), value);
                }
            }
        }
    }

    fn validate_service_dependency(&self, command: &CommandNode) -> Result<(), EngineError> {
        let requires_service = command.config_dependent
            || command.service_dependency_mode == ServiceDependencyMode::Required;

        if requires_service && !self.config.loaded() {
            return Err(EngineError::MissingServiceDirectory(command.key.clone()));
        }

        Ok(())
    }

    fn apply_option_defaults(&self, command: &CommandNode) {
        let mut options = self.options.write().unwrap();

        for (name, spec) in &command.options {
            let Some(default) = &spec.default else {
                continue;
            };

            // Only an unset option or a bare boolean flag takes the default;
            // any other value, falsy included, wins
            let needs_default = match options.get(name) {
                None => true,
                Some(Value::Bool(true)) => true,
                Some(_) => false,
            };

            if needs_default {
                options.insert(name.clone(), default.clone());
            }
        }
    }

    fn validate_required_options(&self, command: &CommandNode) -> Result<(), EngineError> {
        let options = self.options.read().unwrap();

        for (name, spec) in &command.options {
            if spec.required && !options.contains_key(name) {
                return Err(EngineError::MissingRequiredOption(
                    command.key.clone(),
                    name.clone(),
                ));
            }
        }

        Ok(())
    }
}
