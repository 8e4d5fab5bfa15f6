use crate::command::tree::CommandTree;
use crate::error::EngineError;
use std::collections::BTreeMap;

/// A node in the alias tree. Mirrors the command tree's path structure;
/// a node with `command` set is a leaf resolving to a canonical command key.
#[derive(Debug, Clone, Default)]
struct AliasNode {
    command: Option<String>,
    children: BTreeMap<String, AliasNode>,
}

/// Alternate command paths resolving to canonical command keys.
///
/// Both collision directions are validated: an alias may not land on an
/// existing command path, and a later command registration may not land on
/// an existing alias path.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    root: BTreeMap<String, AliasNode>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias_path` (colon-separated) as an alternate path for the
    /// command at `target_key`.
    pub fn create(
        &mut self,
        alias_path: &str,
        target_key: &str,
        commands: &CommandTree,
    ) -> Result<(), EngineError> {
        if alias_path.starts_with(target_key) {
            return Err(EngineError::InvalidCommandAlias(
                alias_path.to_string(),
                "a command cannot be overridden by its own alias".to_string(),
            ));
        }

        let segments: Vec<String> = alias_path.split(':').map(str::to_string).collect();

        if commands.contains_path(&segments) {
            return Err(EngineError::InvalidCommandAlias(
                alias_path.to_string(),
                "the path is already taken by a command".to_string(),
            ));
        }

        let mut children = &mut self.root;
        let (leaf, branches) = segments.split_last().expect("alias path is never empty");

        for segment in branches {
            children = &mut children.entry(segment.clone()).or_default().children;
        }

        let node = children.entry(leaf.clone()).or_default();

        if node.command.is_some() {
            return Err(EngineError::InvalidCommandAlias(
                alias_path.to_string(),
                "an alias is already registered at this path".to_string(),
            ));
        }

        node.command = Some(target_key.to_string());
        Ok(())
    }

    /// Resolve a command path through the alias tree. Returns the canonical
    /// command key if the full path names an alias, else None.
    pub fn resolve(&self, segments: &[String]) -> Option<&str> {
        let mut children = &self.root;
        let mut node = None;

        for segment in segments {
            let next = children.get(segment)?;
            children = &next.children;
            node = Some(next);
        }

        node.and_then(|n| n.command.as_deref())
    }

    /// Whether an alias leaf exists at exactly this command key.
    pub fn claims(&self, key: &str) -> bool {
        let segments: Vec<String> = key.split(':').map(str::to_string).collect();
        self.resolve(&segments).is_some()
    }

    /// Flattened (alias path, target key) pairs, for public command listings.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        Self::collect_entries(&self.root, &mut Vec::new(), &mut out);
        out
    }

    fn collect_entries(
        children: &BTreeMap<String, AliasNode>,
        path: &mut Vec<String>,
        out: &mut Vec<(String, String)>,
    ) {
        for (name, node) in children {
            path.push(name.clone());
            if let Some(command) = &node.command {
                out.push((path.join(":"), command.clone()));
            }
            Self::collect_entries(&node.children, path, out);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        path.split(':').map(str::to_string).collect()
    }

    #[test]
    fn test_create_and_resolve_alias() {
        let mut aliases = AliasTable::new();
        let commands = CommandTree::new();

        aliases.create("push", "deploy", &commands).unwrap();

        assert_eq!(aliases.resolve(&segments("push")), Some("deploy"));
        assert!(aliases.claims("push"));
        assert!(!aliases.claims("deploy"));
    }

    #[test]
    fn test_nested_alias_path() {
        let mut aliases = AliasTable::new();
        let commands = CommandTree::new();

        aliases
            .create("deploy:fn", "deploy:function", &commands)
            .unwrap();

        assert_eq!(
            aliases.resolve(&segments("deploy:fn")),
            Some("deploy:function")
        );
        // Intermediate branch is not itself an alias
        assert_eq!(aliases.resolve(&segments("deploy")), None);
    }

    #[test]
    fn test_self_override_is_rejected() {
        let mut aliases = AliasTable::new();
        let commands = CommandTree::new();

        let err = aliases
            .create("deploy:function", "deploy", &commands)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_COMMAND_ALIAS");
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let mut aliases = AliasTable::new();
        let commands = CommandTree::new();

        aliases.create("push", "deploy", &commands).unwrap();
        let err = aliases.create("push", "remove", &commands).unwrap_err();
        assert_eq!(err.code(), "INVALID_COMMAND_ALIAS");
    }

    #[test]
    fn test_entries_flatten_nested_aliases() {
        let mut aliases = AliasTable::new();
        let commands = CommandTree::new();

        aliases.create("push", "deploy", &commands).unwrap();
        aliases
            .create("deploy:fn", "deploy:function", &commands)
            .unwrap();

        let mut entries = aliases.entries();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                ("deploy:fn".to_string(), "deploy:function".to_string()),
                ("push".to_string(), "deploy".to_string()),
            ]
        );
    }
}
