use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sourcechat")]
#[command(version)]
#[command(about = "Chat with a source-scoped answering service from the terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the answering service (e.g., http://localhost:8000)
    #[arg(short, long, env = "SOURCECHAT_SERVER")]
    pub server: Option<String>,

    /// Model identifier sent with every question
    #[arg(short, long)]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Non-interactive prompt to execute
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Source id to pin the non-interactive prompt to (default: auto-detect)
    #[arg(long, requires = "prompt")]
    pub source: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// List the selectable data sources
    Sources,
    /// Start a chat session (default)
    Chat,
    /// Show version information
    Version,
    /// Check that the answering service is reachable
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
