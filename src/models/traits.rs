use async_trait::async_trait;

use super::types::{ChatRequest, ChatResponse, SourceCatalog};
use crate::utils::ExchangeError;

/// The remote answering service as seen by the client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnsweringService: Send + Sync {
    /// Send one question and wait for its answer
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError>;

    /// Fetch the catalog of selectable sources
    async fn list_sources(&self) -> Result<SourceCatalog, ExchangeError>;

    /// Check that the service is reachable
    async fn health(&self) -> bool {
        true
    }
}
