use super::message::{Message, Role};

/// One row of the timeline view
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEntry {
    Message(Message),
    /// Transient "assistant is typing" marker, never part of the history
    Pending,
}

/// Ordered, append-only conversation log plus the pending indicator
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    /// Lines scrolled up from the bottom; 0 follows the newest message
    scroll_offset: u16,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and snap the view back to the newest entry
    pub fn append_message(&mut self, message: Message) {
        self.entries.push(TimelineEntry::Message(message));
        self.scroll_offset = 0;
    }

    /// Show the typing indicator at the end. An indicator already shown
    /// further up moves to the end, so there is never more than one.
    pub fn show_pending(&mut self) {
        self.clear_pending();
        self.entries.push(TimelineEntry::Pending);
        self.scroll_offset = 0;
    }

    /// Remove the typing indicator if present
    pub fn clear_pending(&mut self) {
        self.entries.retain(|e| !matches!(e, TimelineEntry::Pending));
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, TimelineEntry::Pending))
            .count()
    }

    /// Everything to draw, in display order
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// The persisted history, without the indicator
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|e| match e {
            TimelineEntry::Message(m) => Some(m),
            TimelineEntry::Pending => None,
        })
    }

    pub fn len(&self) -> usize {
        self.messages().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }

    pub fn count_by_role(&self, role: Role) -> usize {
        self.messages().filter(|m| m.role() == role).count()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, amount: u16, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(max_offset);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }
}
