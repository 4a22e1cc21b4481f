use std::fmt;

use crate::protocol::{AgentConfig, ChatOutcome, ChatRequest, Message, RequestId, Role};

/// Transcript text appended when the backend answers without a usable reply.
pub const VALIDITY_FAILURE_TEXT: &str = "Sorry, something went wrong.";
/// Transcript text appended when the backend could not be reached.
pub const TRANSPORT_FAILURE_TEXT: &str = "Failed to connect to the backend.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    InFlight { request_id: RequestId },
}

/// Host side of the session: issues the transport call for an accepted submit.
///
/// The host must eventually report the outcome through
/// [`ChatSession::on_reply`] with the same `request_id`.
pub trait HostOps {
    fn start_request(&mut self, request_id: RequestId, request: ChatRequest) -> Result<(), String>;
}

/// Immutable view of the session handed to listeners and presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub transcript: Vec<Message>,
    pub pending_input: String,
    pub in_flight: bool,
}

pub type SubscriptionId = u64;
pub type SessionListener = Box<dyn FnMut(&SessionSnapshot) + Send>;

pub struct ChatSession {
    config: AgentConfig,
    transcript: Vec<Message>,
    pending_input: String,
    mode: Mode,
    next_request_id: RequestId,
    listeners: Vec<(SubscriptionId, SessionListener)>,
    next_subscription_id: SubscriptionId,
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("config", &self.config)
            .field("transcript", &self.transcript)
            .field("pending_input", &self.pending_input)
            .field("mode", &self.mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(AgentConfig::web_search_agent())
    }
}

impl ChatSession {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            transcript: Vec::new(),
            pending_input: String::new(),
            mode: Mode::Idle,
            next_request_id: 1,
            listeners: Vec::new(),
            next_subscription_id: 1,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.mode, Mode::InFlight { .. })
    }

    pub fn active_request(&self) -> Option<RequestId> {
        match self.mode {
            Mode::InFlight { request_id } => Some(request_id),
            Mode::Idle => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.clone(),
            pending_input: self.pending_input.clone(),
            in_flight: self.is_in_flight(),
        }
    }

    /// Registers a listener notified with a fresh snapshot after every mutation.
    ///
    /// Listeners run while the session is borrowed mutably, so they must not
    /// call back into the session (or a controller wrapping it).
    pub fn subscribe(&mut self, listener: SessionListener) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns false when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    pub fn update_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
        self.notify();
    }

    /// Sends the pending input when it is non-blank and nothing is in flight.
    ///
    /// Returns the id of the accepted request, or `None` when the guard
    /// rejected the submit. A rejected submit leaves all state untouched.
    pub fn submit(&mut self, host: &mut dyn HostOps) -> Option<RequestId> {
        if self.is_in_flight() {
            tracing::debug!("submit ignored: request already in flight");
            return None;
        }

        if self.pending_input.trim().is_empty() {
            tracing::debug!("submit ignored: pending input is blank");
            return None;
        }

        let history = self.transcript.clone();
        let content = std::mem::take(&mut self.pending_input);
        self.transcript.push(Message::user(content.clone()));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.mode = Mode::InFlight { request_id };
        self.notify();

        let request = ChatRequest {
            message: content,
            agent_config: self.config.clone(),
            history,
        };

        tracing::debug!(
            request_id,
            history_len = request.history.len(),
            "issuing chat request"
        );

        if let Err(error) = host.start_request(request_id, request) {
            self.on_reply(request_id, ChatOutcome::TransportFailed { error });
        }

        Some(request_id)
    }

    /// Reconciles the transcript with the outcome of an in-flight request.
    ///
    /// Outcomes for any request other than the active one are ignored and
    /// reported as `false`.
    pub fn on_reply(&mut self, request_id: RequestId, outcome: ChatOutcome) -> bool {
        if self.active_request() != Some(request_id) {
            tracing::debug!(request_id, "ignoring outcome for inactive request");
            return false;
        }

        let content = match outcome {
            ChatOutcome::Reply(text) => {
                tracing::info!(request_id, "agent replied");
                text
            }
            ChatOutcome::MissingResponse { backend_error } => {
                match backend_error {
                    Some(error) => {
                        tracing::warn!(request_id, %error, "backend reported an error")
                    }
                    None => tracing::warn!(request_id, "backend response had no reply text"),
                }
                VALIDITY_FAILURE_TEXT.to_string()
            }
            ChatOutcome::TransportFailed { error } => {
                tracing::warn!(request_id, %error, "chat request failed");
                TRANSPORT_FAILURE_TEXT.to_string()
            }
        };

        self.transcript.push(Message {
            role: Role::Assistant,
            content,
        });
        self.mode = Mode::Idle;
        self.notify();
        true
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
