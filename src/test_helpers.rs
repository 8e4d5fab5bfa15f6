//! Shared fixtures for unit tests

use crate::config::{
    BuildConfig, ProviderConfig, ServiceConfig, ServiceMetadata, ServiceResource, ServiceSpec,
};
use crate::plugin::PluginManager;
use crate::traits::MockOutput;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// A loaded service definition targeting AWS with the given external plugins
pub fn aws_service(plugins: &[&str]) -> ServiceConfig {
    ServiceConfig {
        service: Some(ServiceResource {
            api_version: "skylift.io/v1".to_string(),
            kind: "Service".to_string(),
            metadata: ServiceMetadata {
                name: "test-service".to_string(),
                description: None,
            },
            spec: ServiceSpec {
                provider: ProviderConfig {
                    name: "aws".to_string(),
                    stage: "dev".to_string(),
                    region: None,
                },
                plugins: plugins.iter().map(|p| p.to_string()).collect(),
                build: BuildConfig::default(),
                functions: BTreeMap::new(),
            },
        }),
        service_dir: Some(PathBuf::from("/svc")),
    }
}

/// A manager over the given service config, capturing output in a MockOutput
pub fn manager_with(config: ServiceConfig) -> (PluginManager, Arc<MockOutput>) {
    let output = Arc::new(MockOutput::new());
    let manager = PluginManager::new(config, HashMap::new(), output.clone());
    (manager, output)
}

/// A manager with pre-set CLI options
pub fn manager_with_options(
    config: ServiceConfig,
    options: HashMap<String, serde_json::Value>,
) -> (PluginManager, Arc<MockOutput>) {
    let output = Arc::new(MockOutput::new());
    let manager = PluginManager::new(config, options, output.clone());
    (manager, output)
}
