mod cli;
mod command;
mod config;
mod context;
mod error;
mod hooks;
mod output;
mod plugin;
#[cfg(test)]
mod test_helpers;
mod traits;

use anyhow::Result;
use clap::Parser;
use config::ServiceDiscovery;
use context::Context;
use plugin::PluginManager;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "skylift")]
#[command(about = "Skylift - deploy declarative service definitions through a plugin-driven lifecycle", long_about = None)]
#[command(version)]
struct Cli {
    /// Command path followed by its options, e.g. `deploy function -f api`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();

    let (segments, options) = cli::parse_command_line(&cli.args);
    let service = ServiceDiscovery::find_service(ctx.fs.as_ref())?;

    let mut manager = PluginManager::new(service, options, ctx.output.clone());
    manager.load_all_plugins(ctx.resolver.as_ref())?;

    let manager = Arc::new(manager);
    manager.async_init_all().await?;

    if segments.is_empty() {
        cli::print_general_help(&manager.commands(), ctx.output.as_ref());
        return Ok(());
    }

    manager.run(&segments).await
}
