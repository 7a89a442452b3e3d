// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use http::HttpAnsweringService;
pub use traits::AnsweringService;
pub use types::{
    parse_error_detail, CatalogEntry, ChatRequest, ChatResponse, EntryId, ErrorBody,
    SourceCatalog,
};

#[cfg(test)]
pub use traits::MockAnsweringService;
