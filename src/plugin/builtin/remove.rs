use crate::command::{CommandDetails, CommandMap, OptionSpec};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;

/// Declares the `remove` command surface for tearing deployed services down
pub struct RemovePlugin;

impl Plugin for RemovePlugin {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn commands(&self) -> Option<CommandMap> {
        let remove = CommandDetails::new()
            .usage("Remove all deployed resources of the service")
            .lifecycle_events(["remove"])
            .option(
                "stage",
                OptionSpec::new().usage("Stage of the service").shortcut("s"),
            )
            .option(
                "region",
                OptionSpec::new()
                    .usage("Region of the service")
                    .shortcut("r"),
            )
            .config_dependent();

        Some(CommandMap::from([("remove".to_string(), remove)]))
    }
}

impl PluginConstruct for RemovePlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
