use crate::command::{CommandDetails, CommandMap};
use crate::config::ServiceConfig;
use crate::hooks::{hook, HookFn, HookOutcome};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use crate::traits::Output;
use anyhow::Result;
use std::sync::Arc;

/// Prints a summary of the discovered service definition
pub struct InfoPlugin {
    config: Arc<ServiceConfig>,
    output: Arc<dyn Output>,
}

impl Plugin for InfoPlugin {
    fn name(&self) -> &'static str {
        "info"
    }

    fn commands(&self) -> Option<CommandMap> {
        let info = CommandDetails::new()
            .usage("Display information about the service")
            .lifecycle_events(["info"])
            .config_dependent();

        Some(CommandMap::from([("info".to_string(), info)]))
    }

    fn hooks(&self) -> Option<Vec<(String, HookFn)>> {
        let config = self.config.clone();
        let output = self.output.clone();

        Some(vec![(
            "info:info".to_string(),
            hook(move |_ctx| {
                let config = config.clone();
                let output = output.clone();

                async move {
                    // The command is config-dependent, so a service is loaded
                    // by the time this hook runs
                    let Some(service) = &config.service else {
                        return Ok(HookOutcome::Continue);
                    };

                    output.section("Service Information");
                    output.key_value("service", &service.metadata.name);
                    output.key_value("provider", &service.spec.provider.name);
                    output.key_value("stage", &service.spec.provider.stage);

                    if let Some(region) = &service.spec.provider.region {
                        output.key_value("region", region);
                    }

                    if !service.spec.functions.is_empty() {
                        output.section("Functions");
                        for (name, function) in &service.spec.functions {
                            output.key_value(name, &function.handler);
                        }
                    }

                    Ok(HookOutcome::Continue)
                }
            }),
        )])
    }
}

impl PluginConstruct for InfoPlugin {
    fn build(init: PluginInit) -> Result<Self> {
        Ok(Self {
            config: init.config,
            output: init.utils.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginFactory;
    use crate::test_helpers::{aws_service, manager_with};
    use crate::traits::output::OutputMessage;

    #[tokio::test]
    async fn test_info_hook_prints_service_summary() {
        let (mut manager, output) = manager_with(aws_service(&[]));
        manager
            .add_plugin(PluginFactory::of::<InfoPlugin>(), None)
            .unwrap();

        Arc::new(manager)
            .invoke(&["info".to_string()], false)
            .await
            .unwrap();

        assert!(output.contains_message(&OutputMessage::KeyValue(
            "service".to_string(),
            "test-service".to_string()
        )));
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "provider".to_string(),
            "aws".to_string()
        )));
    }
}
