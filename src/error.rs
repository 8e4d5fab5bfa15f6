use thiserror::Error;

/// Errors raised by the plugin engine.
///
/// Registration errors are fatal at load time; resolution errors are fatal
/// per invocation. Hook failures are ordinary `anyhow` errors and are not
/// represented here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested command path does not exist in the command tree.
    #[error("Unrecognized command \"{0}\". Run \"skylift\" to see all available commands")]
    CommandNotFound(String),

    /// The command exists but is an entrypoint, reachable only via spawn.
    #[error("Command \"{0}\" is internal and cannot be invoked directly")]
    EntrypointNotAccessible(String),

    /// An alias collides with an existing command or alias, or overrides itself.
    #[error("Invalid command alias \"{0}\": {1}")]
    InvalidCommandAlias(String, String),

    /// A command registration lands on a path already claimed by an alias.
    #[error("Command \"{0}\" cannot override an existing alias")]
    CommandOverridesExistingAlias(String),

    /// The same plugin class was registered twice.
    #[error("Plugin \"{0}\" is already registered")]
    DuplicatePluginDefinition(String),

    /// A service-declared external plugin could not be resolved.
    #[error("Plugin \"{0}\" not found. Make sure it is installed and listed under spec.plugins")]
    PluginNotFound(String),

    /// A resolver located a plugin module but could not produce a factory
    /// from it. Raised by resolver implementations, never by the engine.
    #[allow(dead_code)]
    #[error("Plugin \"{0}\" does not export a valid plugin: {1}")]
    InvalidPluginModule(String, String),

    /// An external plugin conflicts with the built-in bundler.
    #[error(
        "Plugin \"{0}\" conflicts with the built-in bundler. \
         Remove the plugin, or disable built-in bundling with \"build.bundler: false\""
    )]
    LegacyBundlerConflict(String),

    /// A config-dependent command was run outside a service directory.
    #[error("Command \"{0}\" can only be run inside a service directory (no skylift.yml found)")]
    MissingServiceDirectory(String),

    /// A required option was not provided and has no default.
    #[error("Command \"{0}\" requires the \"--{1}\" option")]
    MissingRequiredOption(String, String),
}

impl EngineError {
    /// Stable machine-readable code for each error class.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::CommandNotFound(_) => "COMMAND_NOT_FOUND",
            EngineError::EntrypointNotAccessible(_) => "ENTRYPOINT_NOT_ACCESSIBLE",
            EngineError::InvalidCommandAlias(_, _) => "INVALID_COMMAND_ALIAS",
            EngineError::CommandOverridesExistingAlias(_) => {
                "INVALID_COMMAND_OVERRIDE_EXISTING_ALIAS"
            }
            EngineError::DuplicatePluginDefinition(_) => "DUPLICATE_PLUGIN_DEFINITION",
            EngineError::PluginNotFound(_) => "PLUGIN_NOT_FOUND",
            EngineError::InvalidPluginModule(_, _) => "INVALID_PLUGIN_MODULE",
            EngineError::LegacyBundlerConflict(_) => "LEGACY_BUNDLER_CONFLICT",
            EngineError::MissingServiceDirectory(_) => "MISSING_SERVICE_DIRECTORY",
            EngineError::MissingRequiredOption(_, _) => "MISSING_REQUIRED_OPTION",
        }
    }
}
