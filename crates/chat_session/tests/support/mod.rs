#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use chat_session::protocol::{ChatRequest, RequestId};
use chat_session::{HostOps, SessionListener, SessionSnapshot};

#[derive(Default)]
pub struct HostSpy {
    pub started: Vec<(RequestId, ChatRequest)>,
    pub fail_with: Option<String>,
}

impl HostSpy {
    pub fn failing(error: &str) -> Self {
        Self {
            fail_with: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.started
            .iter()
            .map(|(_, request)| request.message.clone())
            .collect()
    }
}

impl HostOps for HostSpy {
    fn start_request(&mut self, request_id: RequestId, request: ChatRequest) -> Result<(), String> {
        self.started.push((request_id, request));
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Collects every snapshot a session publishes.
pub fn recording_listener() -> (SessionListener, Arc<Mutex<Vec<SessionSnapshot>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener: SessionListener = Box::new({
        let seen = Arc::clone(&seen);
        move |snapshot: &SessionSnapshot| lock_unpoisoned(&seen).push(snapshot.clone())
    });
    (listener, seen)
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
