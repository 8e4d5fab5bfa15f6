use crate::command::{CommandDetails, CommandMap, OptionSpec};
use crate::hooks::{hook, HookFn, HookOutcome};
use crate::plugin::{Plugin, PluginConstruct, PluginInit, SpawnOptions};
use anyhow::Result;

/// Declares the `deploy` command surface and packages the service before the
/// provider hooks push it out.
pub struct DeployPlugin;

impl Plugin for DeployPlugin {
    fn name(&self) -> &'static str {
        "deploy"
    }

    fn commands(&self) -> Option<CommandMap> {
        let function = CommandDetails::new()
            .usage("Deploy a single function")
            .lifecycle_events(["initialize", "packageFunction", "deploy"])
            .option(
                "function",
                OptionSpec::new()
                    .usage("Name of the function")
                    .shortcut("f")
                    .required(),
            )
            .option(
                "stage",
                OptionSpec::new().usage("Stage of the service").shortcut("s"),
            )
            .config_dependent();

        let list = CommandDetails::new()
            .usage("List recorded deployments")
            .lifecycle_events(["log"])
            .alias("deployments")
            .config_dependent();

        let deploy = CommandDetails::new()
            .usage("Deploy the service")
            .lifecycle_events(["initialize", "deploy", "finalize"])
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
                OptionSpec::new()
                    .usage("Path of a previously packaged deployment to reuse")
                    .shortcut("p"),
            )
            .option("verbose", OptionSpec::new().usage("Show hook execution"))
            .option("force", OptionSpec::new().usage("Deploy without change detection"))
            .config_dependent()
            .subcommand("function", function)
            .subcommand("list", list);

        Some(CommandMap::from([("deploy".to_string(), deploy)]))
    }

    fn hooks(&self) -> Option<Vec<(String, HookFn)>> {
        Some(vec![(
            "before:deploy:deploy".to_string(),
            hook(|ctx| async move {
                // Reuse a prebuilt package when one was pointed at, otherwise
                // run the packaging lifecycle first
                if ctx.option("package").is_some() {
                    return Ok(HookOutcome::Continue);
                }

                ctx.spawn("package", SpawnOptions::default()).await?;
                Ok(HookOutcome::Continue)
            }),
        )])
    }
}

impl PluginConstruct for DeployPlugin {
    fn build(_init: PluginInit) -> Result<Self> {
        Ok(Self)
    }
}
