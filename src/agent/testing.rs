//! Transport doubles for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use super::transport::{HttpTransport, TransportResponse, CONNECTIVITY_MESSAGE};
use crate::errors::AppError;

pub(crate) fn candidate_body(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

/// Replays queued outcomes in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<TransportResponse, AppError>>>,
    requests: Mutex<Vec<(String, Value)>>,
    bearer_tokens: Mutex<Vec<Option<String>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, status: u16, body: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_string() }));
    }

    pub(crate) fn push_reply(&self, text: &str) {
        self.push_response(200, &candidate_body(text));
    }

    pub(crate) fn push_network_failure(&self) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(AppError::transport(CONNECTIVITY_MESSAGE)));
    }

    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Option<(String, Value)> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn last_bearer_token(&self) -> Option<String> {
        self.bearer_tokens.lock().unwrap().last().cloned().flatten()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &Value,
    ) -> Result<TransportResponse, AppError> {
        self.requests.lock().unwrap().push((url.to_string(), body.clone()));
        self.bearer_tokens.lock().unwrap().push(bearer_token.map(str::to_string));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Unexpected("no scripted response left".into())))
    }
}

/// Holds each request open until `release` is called.
pub(crate) struct GatedTransport {
    started: Notify,
    release: Notify,
    reply: String,
}

impl GatedTransport {
    pub(crate) fn new(reply: &str) -> Self {
        Self { started: Notify::new(), release: Notify::new(), reply: reply.to_string() }
    }

    pub(crate) async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl HttpTransport for GatedTransport {
    async fn post_json(
        &self,
        _url: &str,
        _bearer_token: Option<&str>,
        _body: &Value,
    ) -> Result<TransportResponse, AppError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(TransportResponse { status: 200, body: candidate_body(&self.reply) })
    }
}
