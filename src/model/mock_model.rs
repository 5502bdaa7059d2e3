//! # Mock Completion Model for Testing
//!
//! Provides a `MockCompletionModel` that implements the `CompletionModel` trait
//! and replays a canned answer, so drafting can be tested without API calls.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock completion model for testing purposes.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionModel {
    /// The canned answer; `None` answers with empty text
    response: Arc<Mutex<Option<String>>>,
    /// Number of completion requests served
    calls: Arc<Mutex<usize>>,
}

impl MockCompletionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text the mock model should answer with.
    pub async fn set_text_response(&self, text: &str) {
        *self.response.lock().await = Some(text.to_string());
    }

    /// How many completions were requested
    pub async fn calls(&self) -> usize {
        *self.calls.lock().await
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        *self.calls.lock().await += 1;

        let text = self.response.lock().await.clone().unwrap_or_default();
        Ok(CompletionResponse {
            choice: OneOrMany::one(AssistantContent::text(text)),
            raw_response: String::new(),
        })
    }
}
