use crate::command::{CommandDetails, CommandMap, OptionSpec, ServiceDependencyMode};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;

/// Declares the `invoke` command surface for running deployed functions
pub struct InvokePlugin;

impl Plugin for InvokePlugin {
    fn name(&self) -> &'static str {
        "invoke"
    }

    fn commands(&self) -> Option<CommandMap> {
        let local = CommandDetails::new()
            .usage("Invoke a function locally")
            .lifecycle_events(["loadEnvVars", "invoke"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            )
            .option(
                "data",
                OptionSpec::new().usage("Input data").shortcut("d"),
            )
            .option(
                "path",
                OptionSpec::new()
                    .usage("Path to a JSON file holding input data")
                    .shortcut("p"),
            )
            .service_dependency(ServiceDependencyMode::Optional);

        let invoke = CommandDetails::new()
            .usage("Invoke a deployed function")
            .lifecycle_events(["invoke"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            )
            .option(
                "data",
                OptionSpec::new().usage("Input data").shortcut("d"),
            )
            .option(
                "path",
                OptionSpec::new()
                    .usage("Path to a JSON file holding input data")
                    .shortcut("p"),
            )
            .config_dependent()
            .subcommand("local", local);

        Some(CommandMap::from([("invoke".to_string(), invoke)]))
    }
}

impl PluginConstruct for InvokePlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
