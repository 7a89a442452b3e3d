// Gateway module for the source catalog - follows the Train Station Pattern

mod client;
mod selector;
mod source;

pub use client::SourceCatalogClient;
pub use selector::SourceSelector;
pub use source::{Source, SourceCategory};
