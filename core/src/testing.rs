//! In-process fakes for exercising the API and screens without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::notify::Notifier;
use crate::transport::Transport;

/// Transport that answers from a queue and records every request.
///
/// Clones share the same queue and log. An empty queue answers with a
/// transport error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<HttpResponse, String>>,
    routes: Vec<(HttpMethod, String, Result<HttpResponse, String>)>,
    requests: Vec<HttpRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unrouted request.
    pub fn respond(&self, status: u16, body: &str) {
        self.lock().replies.push_back(Ok(response(status, body)));
    }

    /// Queue a transport failure for the next unrouted request.
    pub fn fail(&self, message: &str) {
        self.lock().replies.push_back(Err(message.to_string()));
    }

    /// Answer every request whose URL ends with `suffix`, regardless of order.
    pub fn route(&self, method: HttpMethod, suffix: &str, status: u16, body: &str) {
        self.lock()
            .routes
            .push((method, suffix.to_string(), Ok(response(status, body))));
    }

    pub fn route_failure(&self, method: HttpMethod, suffix: &str, message: &str) {
        self.lock()
            .routes
            .push((method, suffix.to_string(), Err(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// `"METHOD path"` for each recorded request, paths without the base URL.
    pub fn calls(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|req| {
                let path = req
                    .path
                    .find("/apartments")
                    .map_or(req.path.as_str(), |at| &req.path[at..]);
                format!("{} {path}", req.method)
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut script = self.lock();
        let routed = script
            .routes
            .iter()
            .find(|(method, suffix, _)| *method == request.method && request.path.ends_with(suffix.as_str()))
            .map(|(_, _, reply)| reply.clone());
        script.requests.push(request);
        let reply = match routed {
            Some(reply) => reply,
            None => script
                .replies
                .pop_front()
                .unwrap_or_else(|| Err("no scripted reply".to_string())),
        };
        reply.map_err(ApiError::Transport)
    }
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

/// Notifier that records alerts and answers confirmations with a fixed value.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    confirm_answer: bool,
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    alerts: Vec<(String, String)>,
    confirmations: Vec<(String, String)>,
}

impl RecordingNotifier {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            inner: Arc::default(),
        }
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.lock().alerts.clone()
    }

    pub fn confirmations(&self) -> Vec<(String, String)> {
        self.lock().confirmations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::confirming(true)
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, title: &str, message: &str) {
        self.lock()
            .alerts
            .push((title.to_string(), message.to_string()));
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        self.lock()
            .confirmations
            .push((title.to_string(), message.to_string()));
        self.confirm_answer
    }
}
