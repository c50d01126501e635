//! Mock backend for testing
//!
//! Replays scripted responses in order and records every request it sees.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse};
use super::ChatBackend;

#[derive(Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<VecDeque<ChatResponse>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that answers with `responses`, one per call
    pub fn scripted(responses: impl IntoIterator<Item = ChatResponse>) -> Self {
        let backend = Self::new();
        if let Ok(mut queue) = backend.responses.lock() {
            queue.extend(responses);
        }
        backend
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .ok_or_else(|| Error::Upstream("MockBackend has no scripted response left".into()))
    }

    fn host(&self) -> &str {
        "mock"
    }
}
