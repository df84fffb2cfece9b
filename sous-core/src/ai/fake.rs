//! Fake AI client for testing.
//!
//! Returns deterministic responses based on prompt matching, so tests run
//! without network access or API costs.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{AiClient, AiError, ChatRequest, ChatResponse, Usage};

/// A fake AI client.
///
/// Responses are matched by checking if the request text contains a registered
/// substring (case-insensitive, first registration wins). Every request is
/// recorded so tests can assert on what was, or was not, sent.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    responses: Vec<(String, Result<String, String>)>,
    default_response: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that returns `response` for requests containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_lowercase(), Ok(response.to_string())));
    }

    /// Fail requests containing `prompt_contains` with an API error.
    pub fn add_failure(&mut self, prompt_contains: &str, message: &str) {
        self.responses
            .push((prompt_contains.to_lowercase(), Err(message.to_string())));
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// A client answering every request with a small two-step pasta recipe.
    pub fn with_recipe_response() -> Self {
        Self::new().with_default_response(
            r#"{
                "recipeName": "Simple Pasta",
                "totalTime": "20 minutes",
                "ingredients": ["200g pasta", "1 tsp salt", "water"],
                "steps": [
                    {"action": "Boil water", "duration": 5, "alert": "Wait 5 min"},
                    {"action": "Add pasta", "duration": 0, "alert": "No wait"}
                ]
            }"#,
        )
    }

    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.lock_requests().clone()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ChatRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let text = request.full_text().to_lowercase();
        self.lock_requests().push(request);

        let matched = self
            .responses
            .iter()
            .find(|(pattern, _)| text.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        let content = match matched {
            Some(Ok(content)) => content,
            Some(Err(message)) => return Err(AiError::Api(message)),
            None => match &self.default_response {
                Some(response) => response.clone(),
                None => {
                    return Err(AiError::Api(format!(
                        "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                        text.chars().take(100).collect::<String>()
                    )))
                }
            },
        };

        Ok(ChatResponse {
            content,
            usage: Usage::default(),
        })
    }
}
