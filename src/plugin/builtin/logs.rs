use crate::command::{CommandDetails, CommandMap, OptionSpec};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;
use serde_json::json;

/// Declares the `logs` command surface for fetching function logs
pub struct LogsPlugin;

impl Plugin for LogsPlugin {
    fn name(&self) -> &'static str {
        "logs"
    }

    fn commands(&self) -> Option<CommandMap> {
        let logs = CommandDetails::new()
            .usage("Output the logs of a deployed function")
            .lifecycle_events(["logs"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            )
            .option(
                "tail",
                OptionSpec::new().usage("Tail the log output").shortcut("t"),
            )
            .option(
                "filter",
                OptionSpec::new().usage("Filter expression applied to the log stream"),
            )
            .option(
                "startTime",
                OptionSpec::new()
                    .usage("Logs before this time will not be displayed")
                    .default_value(json!("10m")),
            )
            .config_dependent();

        Some(CommandMap::from([("logs".to_string(), logs)]))
    }
}

impl PluginConstruct for LogsPlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
