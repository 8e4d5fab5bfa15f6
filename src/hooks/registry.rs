use crate::hooks::HookFn;
use crate::traits::Output;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Renamed lifecycle events still accepted at hook-registration time.
    /// Hooks registered against the old base name are retargeted, keeping
    /// their before:/after: decoration.
    static ref DEPRECATED_EVENTS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("deploy:prepare", "package:initialize");
        m.insert("deploy:artifacts", "package:finalize");
        m
    };
}

/// One registered hook with the identity of the plugin that owns it.
pub struct HookEntry {
    pub plugin_name: String,
    pub hook: HookFn,
}

/// Ordered hooks per qualified lifecycle-event name. Lists are append-only;
/// order within a key is plugin-registration order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Vec<HookEntry>>,
    warned_events: HashSet<String>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin's declared hooks, redirecting deprecated event names.
    pub fn register_hooks(
        &mut self,
        plugin_name: &str,
        hooks: Vec<(String, HookFn)>,
        output: &dyn Output,
    ) {
        for (event, hook) in hooks {
            let target = self.redirect_deprecated(&event, output);
            self.hooks.entry(target).or_default().push(HookEntry {
                plugin_name: plugin_name.to_string(),
                hook,
            });
        }
    }

    /// Ordered hooks for a qualified event name; empty if none registered.
    pub fn hooks_for(&self, event: &str) -> &[HookEntry] {
        self.hooks.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct event keys with at least one hook.
    #[allow(dead_code)]
    pub fn event_count(&self) -> usize {
        self.hooks.len()
    }

    fn redirect_deprecated(&mut self, event: &str, output: &dyn Output) -> String {
        let (prefix, base) = split_event(event);

        match DEPRECATED_EVENTS.get(base) {
            Some(new_base) => {
                // Advise once per deprecated base name, not once per hook
                if self.warned_events.insert(base.to_string()) {
                    output.warning(&format!(
                        "Lifecycle event \"{base}\" is deprecated, hooks are redirected to \"{new_base}\""
                    ));
                }
                format!("{prefix}{new_base}")
            }
            None => event.to_string(),
        }
    }
}

/// Split a qualified event name into its phase decoration and base name.
fn split_event(event: &str) -> (&str, &str) {
    for prefix in ["before:", "after:"] {
        if let Some(base) = event.strip_prefix(prefix) {
            return (prefix, base);
        }
    }
    ("", event)
}
