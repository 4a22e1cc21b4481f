use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chat_protocol::WEB_SEARCH_TOOL;

use crate::protocol::{ChatRequest, ChatResponse};
use crate::transport::{ChatTransport, TransportError};
use crate::transports::MOCK_TRANSPORT_ID;

const WEB_SEARCH_TRIGGER: &str = "search the web for";

/// Scripted result for one mock exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Respond(ChatResponse),
    Fail(String),
    Panic,
}

/// Blocks mock exchanges until released, so callers can observe the in-flight state.
#[derive(Debug, Clone, Default)]
pub struct MockGate {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl MockGate {
    pub fn release(&self) {
        let (open, signal) = &*self.state;
        *lock_unpoisoned(open) = true;
        signal.notify_all();
    }

    fn wait(&self) {
        let (open, signal) = &*self.state;
        let mut guard = lock_unpoisoned(open);
        while !*guard {
            guard = match signal.wait(guard) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }
}

/// Deterministic offline transport.
///
/// Scripted replies are consumed in order; once the script is exhausted the
/// transport echoes the message back, answering `search the web for ...`
/// prompts with a canned search summary when the agent has web search.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<MockGate>,
    delay: Option<Duration>,
}

impl MockTransport {
    #[must_use]
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Holds every exchange until the returned gate is released.
    #[must_use]
    pub fn gated(self) -> (Self, MockGate) {
        let gate = MockGate::default();
        (
            Self {
                gate: Some(gate.clone()),
                ..self
            },
            gate,
        )
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock_unpoisoned(&self.requests).clone()
    }

    fn echo(request: &ChatRequest) -> ChatResponse {
        let lowered = request.message.to_lowercase();
        if request.agent_config.has_tool(WEB_SEARCH_TOOL) {
            if let Some((_, query)) = lowered.split_once(WEB_SEARCH_TRIGGER) {
                let query = query.trim();
                return ChatResponse::reply(format!(
                    "I searched the web for '{query}'. This is an offline mock, so no live results are available."
                ));
            }
        }

        ChatResponse::reply(format!(
            "[{}] You said: {} ({} earlier messages)",
            request.agent_config.name,
            request.message,
            request.history.len()
        ))
    }
}

impl ChatTransport for MockTransport {
    fn id(&self) -> &'static str {
        MOCK_TRANSPORT_ID
    }

    fn send(&self, request: ChatRequest) -> Result<ChatResponse, TransportError> {
        lock_unpoisoned(&self.requests).push(request.clone());

        if let Some(gate) = &self.gate {
            gate.wait();
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let scripted = lock_unpoisoned(&self.script).pop_front();
        match scripted {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(error)) => Err(TransportError::Other(error)),
            Some(MockReply::Panic) => panic!("scripted mock transport panic"),
            None => Ok(Self::echo(&request)),
        }
    }

    fn probe(&self) -> Result<Option<String>, TransportError> {
        Ok(Some("mock transport ready".to_string()))
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
