pub mod alias;
pub mod tree;

pub use alias::AliasTable;
pub use tree::{CommandNode, CommandTree, PublicCommand};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Commands a plugin declares, keyed by top-level command name
pub type CommandMap = BTreeMap<String, CommandDetails>;

/// Classification of a command within the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Directly invocable from the CLI surface
    #[default]
    Normal,
    /// Groups sub-commands; has no lifecycle events of its own
    Container,
    /// Invocable only by other plugins via spawn, never from the CLI
    Entrypoint,
}

/// Whether a command needs a discovered service definition to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceDependencyMode {
    /// Runs anywhere
    #[default]
    None,
    /// Uses the service definition when present, runs without one
    Optional,
    /// Fails unless a service definition was discovered
    Required,
}

/// Descriptor for a single CLI option declared by a command
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionSpec {
    /// Help text shown in command listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Single-dash short form, e.g. "f" for "--function"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    /// Value applied when the option is unset or a bare boolean flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Whether invocation fails when the option is missing
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl OptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(mut self, text: &str) -> Self {
        self.usage = Some(text.to_string());
        self
    }

    pub fn shortcut(mut self, shortcut: &str) -> Self {
        self.shortcut = Some(shortcut.to_string());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Command shape as declared by a plugin, before it is merged into the tree
#[derive(Debug, Clone, Default)]
pub struct CommandDetails {
    pub command_type: CommandType,
    pub usage: Option<String>,
    pub lifecycle_events: Vec<String>,
    pub options: BTreeMap<String, OptionSpec>,
    pub commands: BTreeMap<String, CommandDetails>,
    pub aliases: Vec<String>,
    pub config_dependent: bool,
    pub service_dependency_mode: ServiceDependencyMode,
}

impl CommandDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// A command that only groups sub-commands
    pub fn container() -> Self {
        Self {
            command_type: CommandType::Container,
            ..Self::default()
        }
    }

    /// A command reachable only through spawn
    pub fn entrypoint() -> Self {
        Self {
            command_type: CommandType::Entrypoint,
            ..Self::default()
        }
    }

    pub fn usage(mut self, text: &str) -> Self {
        self.usage = Some(text.to_string());
        self
    }

    pub fn lifecycle_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lifecycle_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn option(mut self, name: &str, spec: OptionSpec) -> Self {
        self.options.insert(name.to_string(), spec);
        self
    }

    pub fn subcommand(mut self, name: &str, details: CommandDetails) -> Self {
        self.commands.insert(name.to_string(), details);
        self
    }

    /// Register an alternate dotted path resolving to this command
    pub fn alias(mut self, path: &str) -> Self {
        self.aliases.push(path.to_string());
        self
    }

    pub fn config_dependent(mut self) -> Self {
        self.config_dependent = true;
        self
    }

    pub fn service_dependency(mut self, mode: ServiceDependencyMode) -> Self {
        self.service_dependency_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_spec_builder() {
        let spec = OptionSpec::new()
            .usage("Name of the function")
            .shortcut("f")
            .required();

        assert_eq!(spec.usage.as_deref(), Some("Name of the function"));
        assert_eq!(spec.shortcut.as_deref(), Some("f"));
        assert!(spec.required);
        assert!(spec.default.is_none());
    }

    #[test]
    fn test_command_details_builder() {
        let details = CommandDetails::new()
            .usage("Deploy the service")
            .lifecycle_events(["initialize", "deploy"])
            .option("stage", OptionSpec::new().shortcut("s"))
            .subcommand("function", CommandDetails::entrypoint())
            .alias("push");

        assert_eq!(details.command_type, CommandType::Normal);
        assert_eq!(details.lifecycle_events, vec!["initialize", "deploy"]);
        assert!(details.options.contains_key("stage"));
        assert_eq!(
            details.commands["function"].command_type,
            CommandType::Entrypoint
        );
        assert_eq!(details.aliases, vec!["push"]);
    }

    #[test]
    fn test_container_has_no_lifecycle_events() {
        let details = CommandDetails::container().usage("Manage plugins");
        assert_eq!(details.command_type, CommandType::Container);
        assert!(details.lifecycle_events.is_empty());
    }
}
