use crate::command::{CommandDetails, CommandMap, OptionSpec};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use anyhow::Result;

/// Declares the `package` command surface. Provider plugins attach the hooks
/// that actually produce deployment artifacts.
pub struct PackagePlugin;

impl Plugin for PackagePlugin {
    fn name(&self) -> &'static str {
        "package"
    }

    fn commands(&self) -> Option<CommandMap> {
        // `package function` is spawned by other plugins for single-function
        // deploys and is not reachable from the CLI
        let function = CommandDetails::entrypoint()
            .lifecycle_events(["package"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            );

        let package = CommandDetails::new()
            .usage("Package the service for deployment")
            .lifecycle_events([
                "cleanup",
                "initialize",
                "createArtifacts",
                "compileFunctions",
                "compileEvents",
                "finalize",
            ])
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
            .option(
                "package",
                OptionSpec::new().usage("Path of the target package directory"),
            )
            .config_dependent()
            .subcommand("function", function);

        Some(CommandMap::from([("package".to_string(), package)]))
    }
}

impl PluginConstruct for PackagePlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
