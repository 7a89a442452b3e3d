use anyhow::Result;
use clap::Parser;

use sourcechat::{
    cli::Cli,
    runtime::{Launcher, NonInteractiveRunner},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose
    if cli.verbose {
        init_logger();
    }

    // Check if running in non-interactive mode
    if let Some(prompt) = cli.prompt.clone() {
        run_non_interactive(cli, prompt).await
    } else {
        Launcher::new(cli)?.run().await
    }
}

/// Run in non-interactive mode
async fn run_non_interactive(cli: Cli, prompt: String) -> Result<()> {
    let output_format = cli.output_format;
    let source = cli.source.clone();

    let launcher = Launcher::new(cli)?;
    let runner = NonInteractiveRunner::new(launcher.service()?, launcher.config(), source);

    // Execute the prompt
    let result = runner.execute(prompt).await?;

    // Format and output the result
    let formatted = runner.format_result(&result, output_format);
    println!("{}", formatted);

    // Exit with appropriate code
    if !result.errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
