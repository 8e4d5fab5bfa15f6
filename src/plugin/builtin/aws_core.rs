use crate::hooks::{hook, HookFn, HookOutcome};
use crate::plugin::{Plugin, PluginConstruct, PluginInit};
use crate::traits::Output;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

/// Progress reporting for AWS-targeted services. Loaded only when the
/// service provider is "aws"; the actual provider API calls live in
/// external provider plugins.
pub struct AwsCorePlugin {
    output: Arc<dyn Output>,
}

impl AwsCorePlugin {
    fn progress_hook(&self, message: &'static str) -> HookFn {
        let output = self.output.clone();
        hook(move |_ctx| {
            let output = output.clone();
            async move {
                output.info(message);
                Ok(HookOutcome::Continue)
            }
        })
    }
}

impl Plugin for AwsCorePlugin {
    fn name(&self) -> &'static str {
        "aws-core"
    }

    fn provider(&self) -> Option<&str> {
        Some("aws")
    }

    fn hooks(&self) -> Option<Vec<(String, HookFn)>> {
        let output = self.output.clone();

        Some(vec![
            (
                "deploy:deploy".to_string(),
                self.progress_hook("Deploying service to AWS"),
            ),
            (
                "after:deploy:finalize".to_string(),
                hook(move |ctx| {
                    let output = output.clone();
                    async move {
                        let elapsed = ctx
                            .orchestrator
                            .command_run_start_time()
                            .map(|started| (Utc::now() - started).num_seconds())
                            .unwrap_or(0);
                        output.success(&format!("Service deployed ({elapsed}s)"));
                        Ok(HookOutcome::Continue)
                    }
                }),
            ),
            (
                "remove:remove".to_string(),
                self.progress_hook("Removing deployed resources from AWS"),
            ),
            (
                "rollback:rollback".to_string(),
                self.progress_hook("Rolling back to the previous deployment"),
            ),
        ])
    }
}

impl PluginConstruct for AwsCorePlugin {
    fn build(init: PluginInit) -> Result<Self> {
        Ok(Self {
            output: init.utils.output,
        })
    }
}
