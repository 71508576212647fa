//! In-memory transport used by unit tests

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::Method;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request seen by a [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub query: String,
    pub method: Method,
    pub content_id: Option<String>,
    pub parts: usize,
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<String>>,
    requests: Vec<Recorded>,
}

/// Transport replaying queued responses in order.
///
/// Clones share the same script, so a test can keep a handle after moving
/// one clone into an executor.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body
    pub fn respond(&self, body: impl Into<String>) -> &Self {
        self.push(Ok(body.into()))
    }

    /// Queue an HTTP failure
    pub fn fail(&self, status: u16, body: &str) -> &Self {
        self.push(Err(Error::http_status(status, body)))
    }

    /// Queue an arbitrary outcome
    pub fn push(&self, outcome: Result<String>) -> &Self {
        self.script.lock().unwrap().responses.push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.query).collect()
    }

    fn next(&self, recorded: Recorded) -> Result<String> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(recorded);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("no scripted response left")))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, query: &str, method: Method) -> Result<String> {
        self.next(Recorded {
            query: query.to_string(),
            method,
            content_id: None,
            parts: 0,
        })
    }

    async fn send_multipart(
        &self,
        query: &str,
        content_id: &str,
        binaries: &[Vec<u8>],
        method: Method,
    ) -> Result<String> {
        self.next(Recorded {
            query: query.to_string(),
            method,
            content_id: Some(content_id.to_string()),
            parts: binaries.len(),
        })
    }
}
