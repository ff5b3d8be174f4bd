//! In-memory `Transport` for tests.
//!
//! Records every request it receives and replays queued outcomes in order.
//! With the queue drained it answers with the default outcome, or a
//! `TransportError` when none is set.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

type Outcome = Result<HttpResponse, TransportError>;

#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<VecDeque<Outcome>>,
    default: Mutex<Option<Outcome>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers with `status` and `body`.
    pub fn respond_with(status: u16, body: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_default(Ok(HttpResponse::new(status, body)));
        mock
    }

    /// Always fails at the transport level.
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_default(Err(TransportError::new(message)));
        mock
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        lock(&self.queued).push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.queued).push_back(Err(TransportError::new(message)));
    }

    pub fn set_default(&self, outcome: Outcome) {
        *lock(&self.default) = Some(outcome);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        if let Some(outcome) = lock(&self.queued).pop_front() {
            return outcome;
        }
        lock(&self.default)
            .clone()
            .unwrap_or_else(|| Err(TransportError::new("no mock response configured")))
    }
}

// A panic while holding one of these locks only happens inside a failing
// test; keep going with the inner data.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
