use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    app::{load_config, load_config_file, Config},
    cli::{handle_command, Cli},
    models::{AnsweringService, HttpAnsweringService},
    session::MemoryStorage,
    tui::{run_ui, App},
};

use super::orchestrator::Orchestrator;

/// Wires configuration, the answering service and the terminal UI together
pub struct Launcher {
    cli: Cli,
    config: Config,
}

impl Launcher {
    /// Create a new launcher from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        // An explicit --config must load; the layered default only warns
        let config = if let Some(config_path) = &cli.config {
            load_config_file(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("failed to load config: {}", e);
                    eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                    Config::default()
                }
            }
        };

        let config = apply_overrides(config, &cli);
        Ok(Self { cli, config })
    }

    /// Effective configuration after CLI overrides
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// HTTP client for the configured server
    pub fn service(&self) -> Result<Arc<dyn AnsweringService>> {
        let service = HttpAnsweringService::new(
            &self.config.server.base_url,
            self.config.server.timeout(),
        )?;
        Ok(Arc::new(service))
    }

    /// Run the launcher
    pub async fn run(self) -> Result<()> {
        let service = self.service()?;

        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config, service.clone()).await? {
                return Ok(()); // Command handled, exit
            }
            // Continue to chat for Commands::Chat
        }

        info!(server = %self.config.server.base_url, model = %self.config.chat.model, "starting chat");
        println!(
            "Starting sourcechat against {} with model: {}",
            self.config.server.base_url.cyan(),
            self.config.chat.model.green()
        );

        // One storage per process, the terminal's equivalent of a tab
        let orchestrator = Orchestrator::new(
            service,
            Arc::new(MemoryStorage::new()),
            self.config.chat.clone(),
        );
        let app = App::new(orchestrator, &self.config);

        run_ui(app).await
    }
}

/// CLI flags win over every configuration layer
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(model) = &cli.model {
        config.chat.model = model.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "sourcechat",
            "--server",
            "http://api:9000",
            "--model",
            "llama-3.1-8b",
        ]);
        let config = apply_overrides(Config::default(), &cli);
        assert_eq!(config.server.base_url, "http://api:9000");
        assert_eq!(config.chat.model, "llama-3.1-8b");
    }

    #[test]
    fn test_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat]\nmodel = \"mixtral\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let launcher = Launcher::new(Cli::parse_from(["sourcechat", "--config", &path])).unwrap();
        assert_eq!(launcher.config().chat.model, "mixtral");
        assert!(launcher.service().is_ok());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let cli = Cli::parse_from(["sourcechat", "--config", "/nonexistent/sourcechat.toml"]);
        assert!(Launcher::new(cli).is_err());
    }
}
