use crate::command::{CommandDetails, CommandMap, OptionSpec, ServiceDependencyMode};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;

/// Declares the `rollback` command surface for reverting deployments
pub struct RollbackPlugin;

impl Plugin for RollbackPlugin {
    fn name(&self) -> &'static str {
        "rollback"
    }

    fn commands(&self) -> Option<CommandMap> {
        let function = CommandDetails::new()
            .usage("Roll back a single function to a previous version")
            .lifecycle_events(["rollback"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            )
            .service_dependency(ServiceDependencyMode::Required);

        let rollback = CommandDetails::new()
            .usage("Roll back the service to a previous deployment")
            .lifecycle_events(["initialize", "rollback"])
            .option(
                "timestamp",
                OptionSpec::new()
                    .usage("Timestamp of the deployment to roll back to")
                    .shortcut("t"),
            )
            .service_dependency(ServiceDependencyMode::Required)
            .subcommand("function", function);

        Some(CommandMap::from([("rollback".to_string(), rollback)]))
    }
}

impl PluginConstruct for RollbackPlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
