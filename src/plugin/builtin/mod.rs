pub mod aws_core;
pub mod deploy;
pub mod info;
pub mod invoke;
pub mod logs;
pub mod package;
pub mod plugin_cmd;
pub mod remove;
pub mod rollback;

pub use aws_core::AwsCorePlugin;
pub use deploy::DeployPlugin;
pub use info::InfoPlugin;
pub use invoke::InvokePlugin;
pub use logs::LogsPlugin;
pub use package::PackagePlugin;
pub use plugin_cmd::PluginCommandPlugin;
pub use remove::RemovePlugin;
pub use rollback::RollbackPlugin;

use crate::plugin::PluginFactory;

/// Built-in plugins in their fixed registration order. This order is what
/// determines hook execution order within any shared event.
pub fn builtin_plugins() -> Vec<PluginFactory> {
    vec![
        PluginFactory::of::<PackagePlugin>(),
        PluginFactory::of::<DeployPlugin>(),
        PluginFactory::of::<InvokePlugin>(),
        PluginFactory::of::<InfoPlugin>(),
        PluginFactory::of::<LogsPlugin>(),
        PluginFactory::of::<RollbackPlugin>(),
        PluginFactory::of::<RemovePlugin>(),
        PluginFactory::of::<PluginCommandPlugin>(),
        PluginFactory::of::<AwsCorePlugin>(),
    ]
}
