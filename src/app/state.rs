use crate::catalog::SourceSelector;
use crate::timeline::Timeline;

/// Everything the client knows about the current conversation.
///
/// The UI draws from this and nothing else.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Conversation shown to the user
    pub timeline: Timeline,
    /// Source selector region
    pub selector: SourceSelector,
    /// Text being typed
    pub input: String,
    /// Status line message
    pub status_message: Option<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
