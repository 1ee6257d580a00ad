//! Scripted provider for tests.
//!
//! Replies are handed out in the order they were queued. Every request is
//! recorded so tests can assert on what was (or was not) sent upstream.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{CompletionProvider, CompletionRequest, ProviderError};

#[derive(Default)]
pub struct StubProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub that answers the first call with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new().with_reply(text)
    }

    /// Stub that fails the first call with `err`.
    pub fn failing(err: ProviderError) -> Self {
        Self::new().with_error(err)
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    pub fn with_error(self, err: ProviderError) -> Self {
        self.push(Err(err));
        self
    }

    fn push(&self, reply: Result<String, ProviderError>) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }

    /// Number of completed `complete` calls.
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Copies of every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::InvalidResponse(
                    "stub provider has no scripted reply".into(),
                ))
            })
    }
}
