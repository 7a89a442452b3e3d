use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    app::Config,
    cli::OutputFormat,
    models::AnsweringService,
    session::MemoryStorage,
    timeline::Role,
};

use super::orchestrator::{Orchestrator, SubmitOutcome};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was executed
    pub prompt: String,
    /// The assistant message that closed the exchange (answer or apology)
    pub response: String,
    /// Source the question was pinned to, `None` for auto-detect
    pub source_id: Option<String>,
    /// Any errors that occurred
    pub errors: Vec<String>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Model identifier sent to the service
    pub model: String,
    /// Session id used for the exchange
    pub session_id: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Runs a single exchange without the terminal UI
pub struct NonInteractiveRunner {
    orchestrator: Orchestrator,
    source: Option<String>,
}

impl NonInteractiveRunner {
    /// Create a new non-interactive runner
    pub fn new(service: Arc<dyn AnsweringService>, config: &Config, source: Option<String>) -> Self {
        let orchestrator =
            Orchestrator::new(service, Arc::new(MemoryStorage::new()), config.chat.clone());
        Self { orchestrator, source }
    }

    /// Execute a single prompt and return the result
    pub async fn execute(&self, prompt: String) -> Result<NonInteractiveResult> {
        let start_time = std::time::Instant::now();

        if let Some(source) = &self.source {
            self.orchestrator.load_sources().await;
            if let Some(notice) = self.orchestrator.snapshot().selector.notice() {
                bail!("{}", notice);
            }
            if !self.orchestrator.select_source_by_id(source) {
                bail!("Unknown source id '{}'. Run `sourcechat sources` to list them.", source);
            }
        }

        let mut errors = Vec::new();
        match self.orchestrator.submit(&prompt).await {
            SubmitOutcome::Ignored => bail!("Prompt is empty"),
            SubmitOutcome::Answered(_) => {}
            SubmitOutcome::Failed(e) => errors.push(e.to_string()),
        }

        let response = self
            .orchestrator
            .snapshot()
            .timeline
            .messages()
            .filter(|m| m.role() == Role::Ai)
            .last()
            .map(|m| m.text().to_string())
            .unwrap_or_default();

        Ok(NonInteractiveResult {
            prompt: prompt.trim().to_string(),
            response,
            source_id: self.source.clone(),
            errors,
            metadata: ExecutionMetadata {
                model: self.orchestrator.model().to_string(),
                session_id: self.orchestrator.session_id().to_string(),
                duration_ms: start_time.elapsed().as_millis(),
            },
        })
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = result.response.clone();

                if !result.errors.is_empty() {
                    output.push_str("\n\n--- Errors ---\n");
                    for error in &result.errors {
                        output.push_str(&format!("• {}\n", error));
                    }
                }

                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Question\n\n");
                output.push_str(&result.prompt);
                output.push_str("\n\n## Answer\n\n");
                output.push_str(&result.response);
                output.push_str("\n\n");

                if !result.errors.is_empty() {
                    output.push_str("## Errors\n\n");
                    for error in &result.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!(
                    "*Model: {} | Source: {} | Duration: {}ms*\n",
                    result.metadata.model,
                    result.source_id.as_deref().unwrap_or("auto"),
                    result.metadata.duration_ms
                ));

                output
            }
        }
    }
}
