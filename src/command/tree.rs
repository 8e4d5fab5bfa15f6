use crate::command::alias::AliasTable;
use crate::command::{CommandDetails, CommandType, OptionSpec, ServiceDependencyMode};
use crate::error::EngineError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A command merged into the tree, with its fully qualified key.
#[derive(Debug, Clone)]
pub struct CommandNode {
    /// Colon-joined path, e.g. "deploy:function"
    pub key: String,
    /// Plugin that first registered this command
    pub plugin_name: String,
    pub command_type: CommandType,
    pub usage: Option<String>,
    pub lifecycle_events: Vec<String>,
    pub options: BTreeMap<String, OptionSpec>,
    pub commands: BTreeMap<String, CommandNode>,
    pub config_dependent: bool,
    pub service_dependency_mode: ServiceDependencyMode,
    /// True when this node or any ancestor is an entrypoint
    pub entrypoint_inherited: bool,
}

impl CommandNode {
    /// Hidden from direct CLI invocation, reachable only via spawn
    pub fn is_entrypoint(&self) -> bool {
        self.command_type == CommandType::Entrypoint || self.entrypoint_inherited
    }
}

/// Pruned, serializable view of a command for public listings. Alias entries
/// carry `alias_for` and omit sub-commands so serialization cannot cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lifecycle_events: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionSpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, PublicCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_for: Option<String>,
}

/// Hierarchical registry of commands contributed by plugins.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    root: BTreeMap<String, CommandNode>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level command declared by a plugin, recursing into its
    /// sub-commands and registering its aliases. Declaring a key that already
    /// exists merges additively with the prior registration.
    pub fn register(
        &mut self,
        plugin_name: &str,
        name: &str,
        details: &CommandDetails,
        aliases: &mut AliasTable,
    ) -> Result<(), EngineError> {
        let mut pending_aliases = Vec::new();
        let node = Self::build_node(
            plugin_name,
            name.to_string(),
            details,
            false,
            aliases,
            &mut pending_aliases,
        )?;

        let merged = match self.root.remove(name) {
            Some(existing) => Self::merge(existing, node),
            None => node,
        };
        self.root.insert(name.to_string(), merged);

        for (alias_path, target_key) in pending_aliases {
            aliases.create(&alias_path, &target_key, self)?;
        }

        Ok(())
    }

    fn build_node(
        plugin_name: &str,
        key: String,
        details: &CommandDetails,
        inherited_entrypoint: bool,
        aliases: &AliasTable,
        pending_aliases: &mut Vec<(String, String)>,
    ) -> Result<CommandNode, EngineError> {
        if aliases.claims(&key) {
            return Err(EngineError::CommandOverridesExistingAlias(key));
        }

        let is_entrypoint = inherited_entrypoint || details.command_type == CommandType::Entrypoint;

        for alias in &details.aliases {
            pending_aliases.push((alias.clone(), key.clone()));
        }

        let mut commands = BTreeMap::new();
        for (name, child) in &details.commands {
            let child_key = format!("{key}:{name}");
            commands.insert(
                name.clone(),
                Self::build_node(
                    plugin_name,
                    child_key,
                    child,
                    is_entrypoint,
                    aliases,
                    pending_aliases,
                )?,
            );
        }

        Ok(CommandNode {
            key,
            plugin_name: plugin_name.to_string(),
            command_type: details.command_type,
            usage: details.usage.clone(),
            lifecycle_events: details.lifecycle_events.clone(),
            options: details.options.clone(),
            commands,
            config_dependent: details.config_dependent,
            service_dependency_mode: details.service_dependency_mode,
            entrypoint_inherited: is_entrypoint,
        })
    }

    /// Additive merge of two registrations of the same command key.
    ///
    /// Options fill in only where missing (first registration wins per
    /// option name), lifecycle events are replaced only by a non-empty list,
    /// and sub-commands merge recursively without condition.
    fn merge(mut existing: CommandNode, incoming: CommandNode) -> CommandNode {
        for (name, spec) in incoming.options {
            existing.options.entry(name).or_insert(spec);
        }

        if !incoming.lifecycle_events.is_empty() {
            existing.lifecycle_events = incoming.lifecycle_events;
        }

        for (name, child) in incoming.commands {
            let merged = match existing.commands.remove(&name) {
                Some(prior) => Self::merge(prior, child),
                None => child,
            };
            existing.commands.insert(name, merged);
        }

        if existing.usage.is_none() {
            existing.usage = incoming.usage;
        }

        existing
    }

    /// Resolve a command path, following the alias table first. Entrypoint
    /// commands resolve only when `allow_entrypoints` is set.
    pub fn get<'a>(
        &'a self,
        segments: &[String],
        aliases: &AliasTable,
        allow_entrypoints: bool,
    ) -> Result<&'a CommandNode, EngineError> {
        let resolved: Vec<String> = match aliases.resolve(segments) {
            Some(target) => target.split(':').map(str::to_string).collect(),
            None => segments.to_vec(),
        };

        let display = resolved.join(" ");
        let mut children = &self.root;
        let mut node = None;

        for segment in &resolved {
            let next = children
                .get(segment)
                .ok_or_else(|| EngineError::CommandNotFound(display.clone()))?;
            children = &next.commands;
            node = Some(next);
        }

        let node = node.ok_or(EngineError::CommandNotFound(display.clone()))?;

        if node.is_entrypoint() && !allow_entrypoints {
            return Err(EngineError::EntrypointNotAccessible(display));
        }

        Ok(node)
    }

    /// Whether a command exists at exactly this path (aliases not consulted).
    pub fn contains_path(&self, segments: &[String]) -> bool {
        let mut children = &self.root;
        let mut found = false;

        for segment in segments {
            match children.get(segment) {
                Some(next) => {
                    children = &next.commands;
                    found = true;
                }
                None => return false,
            }
        }

        found
    }

    /// Pruned public view: descent stops at entrypoint nodes, and aliases are
    /// flattened in as entries without sub-commands.
    pub fn public_commands(&self, aliases: &AliasTable) -> BTreeMap<String, PublicCommand> {
        let mut result: BTreeMap<String, PublicCommand> = self
            .root
            .iter()
            .filter(|(_, node)| !node.is_entrypoint())
            .map(|(name, node)| (name.clone(), Self::public_view(node)))
            .collect();

        for (alias_path, target_key) in aliases.entries() {
            result.entry(alias_path).or_insert(PublicCommand {
                usage: None,
                command_type: CommandType::Normal,
                lifecycle_events: Vec::new(),
                options: BTreeMap::new(),
                commands: BTreeMap::new(),
                alias_for: Some(target_key),
            });
        }

        result
    }

    fn public_view(node: &CommandNode) -> PublicCommand {
        PublicCommand {
            usage: node.usage.clone(),
            command_type: node.command_type,
            lifecycle_events: node.lifecycle_events.clone(),
            options: node.options.clone(),
            commands: node
                .commands
                .iter()
                .filter(|(_, child)| !child.is_entrypoint())
                .map(|(name, child)| (name.clone(), Self::public_view(child)))
                .collect(),
            alias_for: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        path.split(' ').map(str::to_string).collect()
    }

    fn register(
        tree: &mut CommandTree,
        aliases: &mut AliasTable,
        plugin: &str,
        name: &str,
        details: CommandDetails,
    ) {
        tree.register(plugin, name, &details, aliases).unwrap();
    }

    #[test]
    fn test_register_and_get_nested_command() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        let details = CommandDetails::container().subcommand(
            "function",
            CommandDetails::new().lifecycle_events(["initialize", "deploy"]),
        );
        register(&mut tree, &mut aliases, "deploy", "deploy", details);

        let node = tree
            .get(&segments("deploy function"), &aliases, false)
            .unwrap();
        assert_eq!(node.key, "deploy:function");
        assert_eq!(node.plugin_name, "deploy");
        assert_eq!(node.lifecycle_events, vec!["initialize", "deploy"]);
    }

    #[test]
    fn test_unknown_command_fails() {
        let tree = CommandTree::new();
        let aliases = AliasTable::new();

        let err = tree.get(&segments("deploy"), &aliases, false).unwrap_err();
        assert_eq!(err.code(), "COMMAND_NOT_FOUND");
    }

    #[test]
    fn test_additive_merge_unions_options() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "core",
            "deploy",
            CommandDetails::new()
                .lifecycle_events(["deploy"])
                .option("stage", OptionSpec::new().shortcut("s")),
        );
        register(
            &mut tree,
            &mut aliases,
            "provider",
            "deploy",
            CommandDetails::new().option("region", OptionSpec::new().shortcut("r")),
        );

        let node = tree.get(&segments("deploy"), &aliases, false).unwrap();
        assert!(node.options.contains_key("stage"));
        assert!(node.options.contains_key("region"));
        // Empty incoming lifecycle list leaves the original in place
        assert_eq!(node.lifecycle_events, vec!["deploy"]);
    }

    #[test]
    fn test_merge_first_registration_wins_per_option() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "core",
            "deploy",
            CommandDetails::new().option("stage", OptionSpec::new().shortcut("s")),
        );
        register(
            &mut tree,
            &mut aliases,
            "provider",
            "deploy",
            CommandDetails::new().option("stage", OptionSpec::new().shortcut("x")),
        );

        let node = tree.get(&segments("deploy"), &aliases, false).unwrap();
        assert_eq!(node.options["stage"].shortcut.as_deref(), Some("s"));
    }

    #[test]
    fn test_merge_extends_container_with_subcommands() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "core",
            "deploy",
            CommandDetails::container(),
        );
        register(
            &mut tree,
            &mut aliases,
            "provider",
            "deploy",
            CommandDetails::new()
                .subcommand("list", CommandDetails::new().lifecycle_events(["log"])),
        );

        let node = tree.get(&segments("deploy list"), &aliases, false).unwrap();
        assert_eq!(node.key, "deploy:list");
        // Container classification of the first registration is kept
        let parent = tree.get(&segments("deploy"), &aliases, false).unwrap();
        assert_eq!(parent.command_type, CommandType::Container);
    }

    #[test]
    fn test_merge_overwrites_lifecycle_events_when_non_empty() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "core",
            "deploy",
            CommandDetails::new().lifecycle_events(["deploy"]),
        );
        register(
            &mut tree,
            &mut aliases,
            "provider",
            "deploy",
            CommandDetails::new().lifecycle_events(["initialize", "deploy"]),
        );

        let node = tree.get(&segments("deploy"), &aliases, false).unwrap();
        assert_eq!(node.lifecycle_events, vec!["initialize", "deploy"]);
    }

    #[test]
    fn test_alias_resolves_to_same_command() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "deploy",
            "deploy",
            CommandDetails::new().lifecycle_events(["deploy"]).alias("push"),
        );

        let direct = tree.get(&segments("deploy"), &aliases, false).unwrap();
        let aliased = tree.get(&segments("push"), &aliases, false).unwrap();
        assert!(std::ptr::eq(direct, aliased));
    }

    #[test]
    fn test_command_cannot_override_existing_alias() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "deploy",
            "deploy",
            CommandDetails::new().alias("push"),
        );

        let err = tree
            .register("other", "push", &CommandDetails::new(), &mut aliases)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_COMMAND_OVERRIDE_EXISTING_ALIAS");
    }

    #[test]
    fn test_alias_cannot_shadow_existing_command() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "remove",
            "remove",
            CommandDetails::new(),
        );

        let err = tree
            .register(
                "deploy",
                "deploy",
                &CommandDetails::new().alias("remove"),
                &mut aliases,
            )
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_COMMAND_ALIAS");
    }

    #[test]
    fn test_entrypoint_requires_permission() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "package",
            "package",
            CommandDetails::new().lifecycle_events(["finalize"]).subcommand(
                "function",
                CommandDetails::entrypoint().lifecycle_events(["package"]),
            ),
        );

        let err = tree
            .get(&segments("package function"), &aliases, false)
            .unwrap_err();
        assert_eq!(err.code(), "ENTRYPOINT_NOT_ACCESSIBLE");

        let node = tree
            .get(&segments("package function"), &aliases, true)
            .unwrap();
        assert_eq!(node.key, "package:function");
    }

    #[test]
    fn test_entrypoint_descendants_are_hidden_by_inheritance() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        let nested = CommandDetails::entrypoint()
            .subcommand("inner", CommandDetails::new().lifecycle_events(["run"]));
        register(
            &mut tree,
            &mut aliases,
            "internal",
            "internal",
            nested,
        );

        let err = tree
            .get(&segments("internal inner"), &aliases, false)
            .unwrap_err();
        assert_eq!(err.code(), "ENTRYPOINT_NOT_ACCESSIBLE");
    }

    #[test]
    fn test_public_commands_prune_entrypoints_and_flatten_aliases() {
        let mut tree = CommandTree::new();
        let mut aliases = AliasTable::new();

        register(
            &mut tree,
            &mut aliases,
            "package",
            "package",
            CommandDetails::new()
                .lifecycle_events(["finalize"])
                .alias("pack")
                .subcommand("function", CommandDetails::entrypoint()),
        );

        let public = tree.public_commands(&aliases);
        assert!(public.contains_key("package"));
        assert!(public["package"].commands.is_empty());

        let alias = &public["pack"];
        assert_eq!(alias.alias_for.as_deref(), Some("package"));
        assert!(alias.commands.is_empty());
    }
}
