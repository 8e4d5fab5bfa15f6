use crate::command::{CommandDetails, CommandMap, OptionSpec};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;

/// Declares the `plugin` self-management command surface. The lifecycle
/// driver runs this command without the `initialize` hooks so it stays
/// usable when another plugin misbehaves during startup.
pub struct PluginCommandPlugin;

impl Plugin for PluginCommandPlugin {
    fn name(&self) -> &'static str {
        "plugin"
    }

    fn commands(&self) -> Option<CommandMap> {
        let install = CommandDetails::new()
            .usage("Add a plugin to the service definition")
            .lifecycle_events(["install"])
            .option(
                "name",
                OptionSpec::new()
                    .usage("Name of the plugin")
                    .shortcut("n")
                    .required(),
            )
            .config_dependent();

        let uninstall = CommandDetails::new()
            .usage("Remove a plugin from the service definition")
            .lifecycle_events(["uninstall"])
            .option(
                "name",
                OptionSpec::new()
                    .usage("Name of the plugin")
                    .shortcut("n")
                    .required(),
            )
            .config_dependent();

        let plugin = CommandDetails::container()
            .usage("Manage the plugins of the service")
            .subcommand("install", install)
            .subcommand("uninstall", uninstall);

        Some(CommandMap::from([("plugin".to_string(), plugin)]))
    }
}

impl PluginConstruct for PluginCommandPlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
