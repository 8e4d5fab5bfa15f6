//! CLI boundary glue: raw-argument tokenizing and command listings.
//!
//! The command tree is assembled at runtime from plugins, so the command
//! path and its options are split out of the raw trailing arguments here
//! rather than declared statically.

use crate::command::{CommandNode, PublicCommand};
use crate::traits::Output;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Split raw CLI tokens into command path segments and an options map.
///
/// Tokens before the first dash-prefixed token form the command path. After
/// that, `--name value`, `--name=value`, `-n value` and bare `--flag` forms
/// are accepted; a bare flag becomes boolean `true`.
pub fn parse_command_line(tokens: &[String]) -> (Vec<String>, HashMap<String, Value>) {
    let mut segments = Vec::new();
    let mut options = HashMap::new();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.peek() {
        if token.starts_with('-') {
            break;
        }
        segments.push(iter.next().unwrap().clone());
    }

    while let Some(token) = iter.next() {
        let name = token.trim_start_matches('-');

        if name.is_empty() {
            continue;
        }

        if let Some((name, value)) = name.split_once('=') {
            options.insert(name.to_string(), Value::String(value.to_string()));
            continue;
        }

        match iter.peek() {
            Some(next) if !next.starts_with('-') => {
                let value = iter.next().unwrap().clone();
                options.insert(name.to_string(), Value::String(value));
            }
            _ => {
                options.insert(name.to_string(), Value::Bool(true));
            }
        }
    }

    (segments, options)
}

/// List the runnable sub-commands of a container command
pub fn print_container_help(command: &CommandNode, output: &dyn Output) {
    output.section(command.usage.as_deref().unwrap_or(&command.key));

    for child in command.commands.values() {
        if child.is_entrypoint() {
            continue;
        }

        let path = child.key.replace(':', " ");
        output.key_value(&path, child.usage.as_deref().unwrap_or(""));
        print_options(&child.options, output);
    }

    output.blank();
}

/// List every public command, for an invocation with no command path
pub fn print_general_help(commands: &BTreeMap<String, PublicCommand>, output: &dyn Output) {
    output.section("Commands");

    for (name, command) in commands {
        if let Some(target) = &command.alias_for {
            output.key_value(name, &format!("Alias for \"{}\"", target.replace(':', " ")));
            continue;
        }

        print_command_entry(name, command, output);
    }

    output.blank();
}

fn print_command_entry(path: &str, command: &PublicCommand, output: &dyn Output) {
    output.key_value(path, command.usage.as_deref().unwrap_or(""));

    for (name, child) in &command.commands {
        print_command_entry(&format!("{path} {name}"), child, output);
    }
}

fn print_options(
    options: &BTreeMap<String, crate::command::OptionSpec>,
    output: &dyn Output,
) {
    for (name, spec) in options {
        let flag = match &spec.shortcut {
            Some(shortcut) => format!("--{name} / -{shortcut}"),
            None => format!("--{name}"),
        };

        let usage = spec.usage.clone().unwrap_or_default();
        let usage = if spec.required {
            format!("{usage} (required)")
        } else {
            usage
        };

        output.dimmed(&format!("    {flag}  {}", usage.trim()));
    }
}
