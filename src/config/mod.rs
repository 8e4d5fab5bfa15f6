use crate::traits::FileSystem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names probed when discovering a service directory
pub const SERVICE_FILE_NAMES: [&str; 2] = ["skylift.yml", "skylift.yaml"];

// ============================================================================
// Service Resource (Kubernetes-style)
// ============================================================================

/// Kubernetes-style Service resource loaded from skylift.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResource {
    /// API version (e.g., "skylift.io/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Kind of resource (always "Service")
    pub kind: String,

    /// Metadata about the service
    pub metadata: ServiceMetadata,

    /// Service specification
    pub spec: ServiceSpec,
}

/// Service metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMetadata {
    /// Name of the service
    pub name: String,

    /// Description of what this service does
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Service specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Target provider configuration (REQUIRED)
    pub provider: ProviderConfig,

    /// External plugins to load, in declaration order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Functions this service deploys
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionSpec>,
}

/// Provider the service deploys to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name (e.g., "aws")
    pub name: String,

    /// Deployment stage
    #[serde(default = "default_stage")]
    pub stage: String,

    /// Provider region
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_stage() -> String {
    "dev".to_string()
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether the built-in bundler is active
    #[serde(default = "default_true")]
    pub bundler: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { bundler: true }
    }
}

fn default_true() -> bool {
    true
}

/// A function deployed by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Handler entry point (e.g., "src/api.handler")
    pub handler: String,

    /// Runtime identifier
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Description of the function
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceResource {
    /// Load a Service resource from a YAML file
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs.read_to_string(path)?;
        let resource: ServiceResource = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse service definition: {:?}", path))?;
        Ok(resource)
    }
}

// ============================================================================
// Service configuration context
// ============================================================================

/// The service configuration the engine runs against. Commands flagged as
/// config-dependent require `service` to be present.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub service: Option<ServiceResource>,
    pub service_dir: Option<PathBuf>,
}

impl ServiceConfig {
    /// Configuration for running outside any service directory
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a service definition was discovered, together with the
    /// directory it lives in
    pub fn loaded(&self) -> bool {
        self.service.is_some() && self.service_dir.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.spec.provider.name.as_str())
    }

    pub fn declared_plugins(&self) -> &[String] {
        self.service
            .as_ref()
            .map(|s| s.spec.plugins.as_slice())
            .unwrap_or(&[])
    }

    /// True unless the service definition disables built-in bundling
    pub fn bundler_enabled(&self) -> bool {
        self.service
            .as_ref()
            .map(|s| s.spec.build.bundler)
            .unwrap_or(true)
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Discovery for service definitions
pub struct ServiceDiscovery;

impl ServiceDiscovery {
    /// Try to find a service definition in the current directory or parents
    pub fn find_service(fs: &dyn FileSystem) -> Result<ServiceConfig> {
        let current_dir = std::env::current_dir()?;
        Self::find_service_in_path(fs, &current_dir)
    }

    /// Try to find a service definition starting from a specific path
    pub fn find_service_in_path(fs: &dyn FileSystem, start_path: &Path) -> Result<ServiceConfig> {
        let mut current = start_path.to_path_buf();

        loop {
            for file_name in SERVICE_FILE_NAMES {
                let service_file = current.join(file_name);

                if fs.exists(&service_file) {
                    let service = ServiceResource::from_file(fs, &service_file)?;
                    return Ok(ServiceConfig {
                        service: Some(service),
                        service_dir: Some(current),
                    });
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(ServiceConfig::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    const SERVICE_YAML: &str = r#"
apiVersion: skylift.io/v1
kind: Service
metadata:
  name: orders-api
spec:
  provider:
    name: aws
    region: eu-west-1
  plugins:
    - skylift-domain-manager
  functions:
    api:
      handler: src/api.handler
      runtime: node20
"#;

    #[test]
    fn test_parse_service_resource() {
        let fs = MockFileSystem::new().with_file("/svc/skylift.yml", SERVICE_YAML);
        let service = ServiceResource::from_file(&fs, Path::new("/svc/skylift.yml")).unwrap();

        assert_eq!(service.metadata.name, "orders-api");
        assert_eq!(service.spec.provider.name, "aws");
        assert_eq!(service.spec.provider.stage, "dev");
        assert_eq!(service.spec.provider.region.as_deref(), Some("eu-west-1"));
        assert_eq!(service.spec.plugins, vec!["skylift-domain-manager"]);
        assert!(service.spec.build.bundler);
        assert_eq!(service.spec.functions["api"].handler, "src/api.handler");
    }

    #[test]
    fn test_bundler_can_be_disabled() {
        let yaml = r#"
apiVersion: skylift.io/v1
kind: Service
metadata:
  name: svc
spec:
  provider:
    name: aws
  build:
    bundler: false
"#;
        let fs = MockFileSystem::new().with_file("/svc/skylift.yml", yaml);
        let config =
            ServiceDiscovery::find_service_in_path(&fs, Path::new("/svc")).unwrap();
        assert!(!config.bundler_enabled());
    }

    #[test]
    fn test_discovery_walks_parent_directories() {
        let fs = MockFileSystem::new().with_file("/work/svc/skylift.yml", SERVICE_YAML);

        let config =
            ServiceDiscovery::find_service_in_path(&fs, Path::new("/work/svc/nested/dir"))
                .unwrap();

        assert!(config.loaded());
        assert_eq!(config.service_dir.as_deref(), Some(Path::new("/work/svc")));
        assert_eq!(config.provider_name(), Some("aws"));
    }

    #[test]
    fn test_discovery_without_service_file() {
        let fs = MockFileSystem::new();
        let config = ServiceDiscovery::find_service_in_path(&fs, Path::new("/nowhere")).unwrap();

        assert!(!config.loaded());
        assert!(config.provider_name().is_none());
        assert!(config.declared_plugins().is_empty());
        assert!(config.bundler_enabled());
    }

    #[test]
    fn test_invalid_service_file_fails() {
        let fs = MockFileSystem::new().with_file("/svc/skylift.yml", "not: [valid");
        let result = ServiceDiscovery::find_service_in_path(&fs, Path::new("/svc"));
        assert!(result.is_err());
    }
}
