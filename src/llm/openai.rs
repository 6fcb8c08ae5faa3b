// OpenAI-compatible chat completions client.
//
// Speaks the `/chat/completions` wire format, which most hosted and local
// model servers accept. Sampling temperature is pinned to zero so the
// structured JSON replies the codification prompts demand stay as
// reproducible as the model allows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CompletionClient, ServiceError};

/// Default completions endpoint base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Thin chat-completions client. Credentials are injected at construction —
/// there is no ambient global API-key state.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client for the given endpoint, key, and model.
    ///
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1`) — the
    /// `/chat/completions` path is appended per call.
    pub fn new(base_url: &str, api_key: String, model: String) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent("magpie/0.1 (social-listening)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::RateLimited { body });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http { status, body });
        }

        let completion: ChatResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ServiceError::EmptyCompletion)
    }
}

// -- Chat completions request/response types --

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
