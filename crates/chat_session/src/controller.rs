use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crate::protocol::{ChatOutcome, ChatRequest, RequestId};
use crate::session::{ChatSession, HostOps, SessionListener, SessionSnapshot, SubscriptionId};
use crate::transport::ChatTransport;

const ERROR_REQUEST_ALREADY_ACTIVE: &str = "Request already active";

struct ActiveRequest {
    request_id: RequestId,
    join_handle: Option<JoinHandle<()>>,
}

/// Runs a [`ChatSession`] against a [`ChatTransport`].
///
/// Each accepted submit spawns one worker thread that performs the blocking
/// transport call and applies the classified outcome back to the session.
/// Lock order is always session, then active request.
pub struct ChatController {
    session: Arc<Mutex<ChatSession>>,
    transport: Arc<dyn ChatTransport>,
    active_request: Mutex<Option<ActiveRequest>>,
}

impl ChatController {
    pub fn new(session: ChatSession, transport: Arc<dyn ChatTransport>) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
            transport,
            active_request: Mutex::new(None),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_session().snapshot()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock_session().is_in_flight()
    }

    pub fn update_input(&self, text: impl Into<String>) {
        self.lock_session().update_input(text);
    }

    pub fn submit(self: &Arc<Self>) -> Option<RequestId> {
        let mut host = Arc::clone(self);
        self.lock_session().submit(&mut host)
    }

    /// Registers a session listener. Listeners may run on worker threads and
    /// must not call back into the controller.
    pub fn subscribe(&self, listener: SessionListener) -> SubscriptionId {
        self.lock_session().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_session().unsubscribe(id)
    }

    /// Blocks until the active request, if any, has been reconciled.
    pub fn wait_until_idle(&self) {
        let join_handle = self
            .lock_active_request()
            .as_mut()
            .and_then(|active| active.join_handle.take());

        if let Some(join_handle) = join_handle {
            if join_handle.join().is_err() {
                tracing::error!("chat request worker panicked outside the transport call");
            }
        }
    }

    fn start_request_internal(
        self: &Arc<Self>,
        request_id: RequestId,
        request: ChatRequest,
    ) -> Result<(), String> {
        let mut active_request = self.lock_active_request();
        if active_request.is_some() {
            return Err(ERROR_REQUEST_ALREADY_ACTIVE.to_string());
        }

        let join_handle = self.spawn_worker(request_id, request)?;
        *active_request = Some(ActiveRequest {
            request_id,
            join_handle: Some(join_handle),
        });

        Ok(())
    }

    fn spawn_worker(
        self: &Arc<Self>,
        request_id: RequestId,
        request: ChatRequest,
    ) -> Result<JoinHandle<()>, String> {
        let controller = Arc::clone(self);
        thread::Builder::new()
            .name(format!("agent-chat-request-{request_id}"))
            .spawn(move || controller.run_worker(request_id, request))
            .map_err(|error| format!("Failed to spawn request worker: {error}"))
    }

    fn run_worker(self: Arc<Self>, request_id: RequestId, request: ChatRequest) {
        let transport = Arc::clone(&self.transport);
        let outcome = match catch_unwind(AssertUnwindSafe(|| transport.send(request))) {
            Ok(Ok(response)) => ChatOutcome::from_response(&response),
            Ok(Err(error)) => ChatOutcome::TransportFailed {
                error: error.to_string(),
            },
            Err(_) => ChatOutcome::TransportFailed {
                error: "Transport panicked".to_string(),
            },
        };

        self.apply_outcome(request_id, outcome);
    }

    fn apply_outcome(&self, request_id: RequestId, outcome: ChatOutcome) {
        let mut session = self.lock_session();
        session.on_reply(request_id, outcome);
        self.clear_active_request_if_matching(request_id);
    }

    fn clear_active_request_if_matching(&self, request_id: RequestId) {
        let mut active_request = self.lock_active_request();
        let matches = active_request.as_ref().map(|active| active.request_id) == Some(request_id);
        if !matches {
            return;
        }

        let Some(mut completed) = active_request.take() else {
            return;
        };

        if let Some(join_handle) = completed.join_handle.take() {
            let is_current_thread = join_handle.thread().id() == thread::current().id();
            if !is_current_thread && join_handle.is_finished() {
                let _ = join_handle.join();
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, ChatSession> {
        lock_unpoisoned(&self.session)
    }

    fn lock_active_request(&self) -> MutexGuard<'_, Option<ActiveRequest>> {
        lock_unpoisoned(&self.active_request)
    }
}

impl HostOps for Arc<ChatController> {
    fn start_request(&mut self, request_id: RequestId, request: ChatRequest) -> Result<(), String> {
        self.start_request_internal(request_id, request)
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
