use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::errors::TransportError;
use crate::models::ChatMessage;
use crate::steps::{step_progress, ChatIntent, ConversationStep};
use crate::transport::ChatTransport;
use crate::view::ChatView;

pub const VERIFY_EMAIL_MESSAGE: &str =
    "Please verify your email address to use the chat assistant.";
pub const START_FAILED_MESSAGE: &str = "Failed to start the chat assistant. Please try again.";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Put the text of a failed send back into the input field.
    pub restore_draft_on_failure: bool,
}

/// Client-visible conversation state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub is_open: bool,
    pub messages: Vec<ChatMessage>,
    pub input_value: String,
    pub is_loading: bool,
    pub session_id: Option<String>,
    pub current_step: ConversationStep,
    pub current_intent: ChatIntent,
    pub error: Option<String>,
    pub report_id: Option<String>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            is_open: false,
            messages: Vec::new(),
            input_value: String::new(),
            is_loading: false,
            session_id: None,
            current_step: ConversationStep::Greeting,
            current_intent: ChatIntent::Unknown,
            error: None,
            report_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Closed,
    OpenNoSession,
    OpenLoading,
    OpenReady,
    OpenError,
}

impl ChatState {
    pub fn phase(&self) -> ChatPhase {
        if !self.is_open {
            ChatPhase::Closed
        } else if self.is_loading {
            ChatPhase::OpenLoading
        } else if self.error.is_some() {
            ChatPhase::OpenError
        } else if self.session_id.is_none() {
            ChatPhase::OpenNoSession
        } else {
            ChatPhase::OpenReady
        }
    }
}

/// Enter submits; Shift+Enter is left to insert a newline.
pub fn is_submit_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

struct Inner {
    state: ChatState,
    /// Bumped on reset; replies dispatched under an older value are dropped.
    generation: u64,
}

/// Owner of the assistant conversation: session lifecycle, the send guard,
/// and the translation of transport failures into display text.
///
/// Cloning yields another handle to the same conversation.
pub struct ChatController<T: ChatTransport> {
    transport: Arc<T>,
    view: Arc<dyn ChatView>,
    inner: Arc<Mutex<Inner>>,
    config: ControllerConfig,
}

impl<T: ChatTransport> Clone for ChatController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            view: Arc::clone(&self.view),
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<T: ChatTransport> ChatController<T> {
    pub fn new(transport: T, view: Arc<dyn ChatView>, config: ControllerConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            view,
            inner: Arc::new(Mutex::new(Inner { state: ChatState::default(), generation: 0 })),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ChatState {
        self.lock().state.clone()
    }

    pub fn phase(&self) -> ChatPhase {
        self.lock().state.phase()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().state.input_value = text.into();
    }

    /// Progress of the current step as `(position, total)`.
    pub fn progress(&self) -> Option<(usize, usize)> {
        step_progress(self.lock().state.current_step)
    }

    pub fn quick_replies(&self) -> &'static [&'static str] {
        self.lock().state.current_step.quick_replies()
    }

    /// Reveals the widget, starting a session the first time.
    pub async fn open(&self) {
        let should_start = {
            let mut inner = self.lock();
            if inner.state.is_open {
                return;
            }
            inner.state.is_open = true;
            let state = &inner.state;
            state.session_id.is_none() && state.messages.is_empty() && !state.is_loading
        };
        self.view.focus_input();
        if should_start {
            self.start_session().await;
        }
    }

    /// Hides the widget. The conversation survives until reset.
    pub fn close(&self) {
        self.lock().state.is_open = false;
    }

    /// Drops the current conversation and starts a fresh session.
    pub async fn reset(&self) {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = ChatState { is_open: true, ..ChatState::default() };
        }
        info!("Chat conversation reset");
        self.view.scroll_to_latest();
        self.start_session().await;
    }

    /// Only `open` and `reset` start sessions; a call already in flight
    /// (start or send) makes this a no-op.
    async fn start_session(&self) {
        let generation = {
            let mut inner = self.lock();
            if inner.state.is_loading {
                return;
            }
            inner.state.is_loading = true;
            inner.state.error = None;
            inner.generation
        };

        let result = self.transport.start_session().await;

        let seeded = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!("Discarding session start for a superseded conversation");
                return;
            }
            let state = &mut inner.state;
            state.is_loading = false;
            match result {
                Ok(resp) => {
                    info!(step = ?resp.step, "Chat session started");
                    debug!(session_id = %resp.session_id, "Session issued");
                    state.session_id = Some(resp.session_id);
                    state.current_step = resp.step;
                    state.current_intent = resp.intent.unwrap_or_default();
                    state.messages = vec![ChatMessage::assistant(resp.reply, None)];
                    true
                }
                Err(err) => {
                    warn!("Failed to start chat session: {err}");
                    state.error = Some(start_error_message(&err));
                    false
                }
            }
        };

        if seeded {
            self.view.scroll_to_latest();
        }
    }

    /// Sends one user turn. Blank text, a call already in flight, or a
    /// missing session make this a no-op.
    pub async fn send_message(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let (session_id, generation) = {
            let mut inner = self.lock();
            if inner.state.is_loading {
                return;
            }
            let Some(session_id) = inner.state.session_id.clone() else {
                return;
            };
            let state = &mut inner.state;
            state.messages.push(ChatMessage::user(trimmed));
            state.input_value.clear();
            state.is_loading = true;
            state.error = None;
            (session_id, inner.generation)
        };
        self.view.scroll_to_latest();

        let result = self.transport.send_message(&session_id, trimmed).await;

        let appended = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!("Discarding reply for a superseded conversation");
                false
            } else {
                let state = &mut inner.state;
                state.is_loading = false;
                match result {
                    Ok(resp) => {
                        debug!(step = ?resp.step, intent = ?resp.intent, "Assistant replied");
                        state.current_step = resp.step;
                        if let Some(intent) = resp.intent {
                            state.current_intent = intent;
                        }
                        if let Some(report_id) = resp.report_id.filter(|id| !id.is_empty()) {
                            info!(%report_id, "Report filed from conversation");
                            state.report_id = Some(report_id);
                        }
                        state
                            .messages
                            .push(ChatMessage::assistant(resp.reply, resp.query_result));
                        true
                    }
                    Err(err) => {
                        warn!("Failed to send chat message: {err}");
                        state.error = Some(send_error_message(&err));
                        if self.config.restore_draft_on_failure && state.input_value.is_empty() {
                            state.input_value = text.to_string();
                        }
                        false
                    }
                }
            }
        };

        if appended {
            self.view.scroll_to_latest();
        }
        self.view.focus_input();
    }

    /// Sends the current draft (form submit / send button).
    pub async fn submit(&self) {
        let draft = self.lock().state.input_value.clone();
        self.send_message(&draft).await;
    }

    /// Handles a key press in the input field. Returns `true` when the key
    /// submitted the draft and its default newline must be suppressed.
    pub async fn handle_key(&self, key: &str, shift: bool) -> bool {
        if !is_submit_key(key, shift) {
            return false;
        }
        self.submit().await;
        true
    }
}

fn start_error_message(err: &TransportError) -> String {
    if err.is_unauthorized() {
        VERIFY_EMAIL_MESSAGE.to_string()
    } else {
        START_FAILED_MESSAGE.to_string()
    }
}

fn send_error_message(err: &TransportError) -> String {
    if err.is_unauthorized() {
        VERIFY_EMAIL_MESSAGE.to_string()
    } else {
        err.server_message().unwrap_or(SEND_FAILED_MESSAGE).to_string()
    }
}
