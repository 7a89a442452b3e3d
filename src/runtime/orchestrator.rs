use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    app::{ChatConfig, ChatState},
    catalog::SourceCatalogClient,
    constants::{DETAILED_APOLOGY_PREFIX, GENERIC_APOLOGY},
    models::{AnsweringService, ChatRequest},
    session::{SessionId, SessionIdentity, TabStorage},
    timeline::Message,
    utils::ExchangeError,
};

/// How a single submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// The service answered; the answer is now in the timeline
    Answered(String),
    /// The exchange failed; an apology is now in the timeline
    Failed(ExchangeError),
}

/// Turns user submissions into exchanges with the answering service and
/// reconciles the results into the shared [`ChatState`].
///
/// Cloning is cheap and every clone drives the same state. Exchanges are not
/// serialized: when a second question is sent before the first is answered,
/// the answers land in whatever order the service replies, and the first
/// answer to arrive also removes the shared typing indicator.
#[derive(Clone)]
pub struct Orchestrator {
    service: Arc<dyn AnsweringService>,
    catalog: SourceCatalogClient,
    identity: SessionIdentity,
    state: Arc<Mutex<ChatState>>,
    chat: ChatConfig,
}

impl Orchestrator {
    pub fn new(
        service: Arc<dyn AnsweringService>,
        storage: Arc<dyn TabStorage>,
        chat: ChatConfig,
    ) -> Self {
        Self::with_state(service, storage, chat, Arc::new(Mutex::new(ChatState::new())))
    }

    /// Build around an existing state handle
    pub fn with_state(
        service: Arc<dyn AnsweringService>,
        storage: Arc<dyn TabStorage>,
        chat: ChatConfig,
        state: Arc<Mutex<ChatState>>,
    ) -> Self {
        Self {
            catalog: SourceCatalogClient::new(service.clone()),
            service,
            identity: SessionIdentity::new(storage),
            state,
            chat,
        }
    }

    /// Shared handle to the state the UI draws from
    pub fn state(&self) -> Arc<Mutex<ChatState>> {
        self.state.clone()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ChatState {
        self.state.lock().clone()
    }

    pub fn session_id(&self) -> SessionId {
        self.identity.get_or_create_session_id()
    }

    pub fn model(&self) -> &str {
        &self.chat.model
    }

    /// Wait the greeting delay, then add the assistant greeting
    pub async fn seed_greeting(&self) {
        tokio::time::sleep(self.chat.greeting_delay()).await;
        self.state
            .lock()
            .timeline
            .append_message(Message::ai(self.chat.greeting.clone()));
    }

    /// Fetch the catalog and replace the selector region with the result
    pub async fn load_sources(&self) {
        let selector = self.catalog.load_sources().await;
        let mut state = self.state.lock();
        if let Some(notice) = selector.notice() {
            state.set_status(notice.to_string());
        }
        state.selector = selector;
    }

    /// Activate the source control at `index`
    pub fn click_source(&self, index: usize) -> bool {
        self.state.lock().selector.click(index)
    }

    pub fn select_next_source(&self) -> bool {
        self.state.lock().selector.select_next()
    }

    pub fn select_previous_source(&self) -> bool {
        self.state.lock().selector.select_previous()
    }

    /// Pin the selection to the source with identifier `id`.
    /// Returns false when no loaded control carries it.
    pub fn select_source_by_id(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let index = state
            .selector
            .controls()
            .iter()
            .position(|s| s.id.as_deref() == Some(id));
        match index {
            Some(i) => state.selector.click(i),
            None => false,
        }
    }

    /// Run one exchange for `raw`.
    ///
    /// The human message, input reset and typing indicator are applied before
    /// the request leaves. The indicator is always removed before the answer
    /// or apology is appended.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        match self.begin_submit(raw) {
            Some(request) => self.complete(request).await,
            None => SubmitOutcome::Ignored,
        }
    }

    /// Fire-and-forget variant for event handlers. The synchronous part of the
    /// submission is applied before this returns; `None` means blank input.
    pub fn spawn_submit(&self, raw: &str) -> Option<JoinHandle<SubmitOutcome>> {
        let request = self.begin_submit(raw)?;
        let orchestrator = self.clone();
        Some(tokio::spawn(async move { orchestrator.complete(request).await }))
    }

    /// Apply the local half of a submission and build its request
    fn begin_submit(&self, raw: &str) -> Option<ChatRequest> {
        let question = raw.trim();
        if question.is_empty() {
            return None;
        }

        let source_id = {
            let mut state = self.state.lock();
            state.timeline.append_message(Message::human(question));
            state.input.clear();
            state.timeline.show_pending();
            state.selector.active_source_id()
        };

        Some(ChatRequest {
            question: question.to_string(),
            session_id: self.identity.get_or_create_session_id().to_string(),
            model: self.chat.model.clone(),
            source_id,
        })
    }

    /// Send the request and reconcile the result into the timeline
    async fn complete(&self, request: ChatRequest) -> SubmitOutcome {
        info!(session_id = %request.session_id, source_id = ?request.source_id, "submitting question");

        let result = self.service.chat(&request).await;

        let mut state = self.state.lock();
        state.timeline.clear_pending();
        match result {
            Ok(response) => {
                debug!(chars = response.answer.len(), "answer received");
                state
                    .timeline
                    .append_message(Message::ai(response.answer.clone()));
                SubmitOutcome::Answered(response.answer)
            }
            Err(e) => {
                warn!("exchange failed: {}", e);
                state.timeline.append_message(Message::ai(apology_for(&e)));
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Conversational text shown for a failed exchange
pub fn apology_for(err: &ExchangeError) -> String {
    match err.detail() {
        Some(detail) => format!("{}{}", DETAILED_APOLOGY_PREFIX, detail),
        None => GENERIC_APOLOGY.to_string(),
    }
}
