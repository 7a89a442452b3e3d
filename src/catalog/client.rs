use std::sync::Arc;
use tracing::{info, warn};

use super::selector::SourceSelector;
use crate::models::AnsweringService;

/// Fetches the source catalog and turns it into selector state
#[derive(Clone)]
pub struct SourceCatalogClient {
    service: Arc<dyn AnsweringService>,
}

impl SourceCatalogClient {
    pub fn new(service: Arc<dyn AnsweringService>) -> Self {
        Self { service }
    }

    /// Fetch the catalog once. Failures produce the notice state; there is
    /// no retry here.
    pub async fn load_sources(&self) -> SourceSelector {
        match self.service.list_sources().await {
            Ok(catalog) => {
                info!(
                    excel = catalog.excel.len(),
                    rag = catalog.rag.len(),
                    "source catalog loaded"
                );
                SourceSelector::from_catalog(catalog)
            }
            Err(e) => {
                warn!("could not load source catalog: {}", e);
                SourceSelector::failed()
            }
        }
    }
}
