/// Conversation timeline module - Gateway

mod message;
#[allow(clippy::module_inception)]
mod timeline;

pub use message::{Message, Role};
pub use timeline::{Timeline, TimelineEntry};
