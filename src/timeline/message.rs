use chrono::{DateTime, Local};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Ai,
}

/// One entry of the conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    text: String,
    role: Role,
    rendered_as_markup: bool,
    timestamp: DateTime<Local>,
}

impl Message {
    /// User-typed text, always shown literally
    pub fn human(text: impl Into<String>) -> Self {
        Self::new(text.into(), Role::Human)
    }

    /// Assistant text, shown through the markup formatter
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(text.into(), Role::Ai)
    }

    fn new(text: String, role: Role) -> Self {
        Self {
            text,
            role,
            rendered_as_markup: role == Role::Ai,
            timestamp: Local::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn rendered_as_markup(&self) -> bool {
        self.rendered_as_markup
    }

    /// When the message entered the timeline
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}
