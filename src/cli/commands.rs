use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::{init_config, Config},
    catalog::{SourceCatalogClient, SourceSelector},
    models::AnsweringService,
};

use super::Commands;

/// Handle CLI subcommands. Returns true when the command was fully handled
/// and the chat UI should not start.
pub async fn handle_command(
    command: &Commands,
    config: &Config,
    service: Arc<dyn AnsweringService>,
) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing sourcechat configuration...");
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display());
            Ok(true)
        }
        Commands::Sources => {
            list_sources(service).await;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config, service.as_ref()).await;
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Print the selectable sources, the same list the selector panel shows
pub async fn list_sources(service: Arc<dyn AnsweringService>) {
    let selector = SourceCatalogClient::new(service).load_sources().await;
    match &selector {
        SourceSelector::Loaded { title, .. } => {
            println!("{}", title.bold());
            for source in selector.controls() {
                match &source.id {
                    Some(id) => println!(
                        "  • {} {} {}",
                        source.label.green(),
                        format!("[{}]", source.category.display_name()).dimmed(),
                        format!("id={}", id).dimmed()
                    ),
                    None => println!("  • {} (default)", source.label.cyan()),
                }
            }
        }
        SourceSelector::Failed { notice } => println!("{}", notice.red()),
        SourceSelector::NotLoaded => {}
    }
}

/// Show version information
pub fn show_version() {
    println!("sourcechat v{}", env!("CARGO_PKG_VERSION"));
    println!("   Chat with a source-scoped answering service");
}

/// Show connectivity and configuration
async fn show_status(config: &Config, service: &dyn AnsweringService) {
    println!("sourcechat status:");
    println!();

    if service.health().await {
        println!("  [OK] Answering service: {}", config.server.base_url.green());
    } else {
        println!("  [ERROR] Answering service: {} unreachable", config.server.base_url.red());
    }

    println!("  Model: {}", config.chat.model);
    println!("  Request timeout: {}s", config.server.timeout_secs);
    println!();
}
