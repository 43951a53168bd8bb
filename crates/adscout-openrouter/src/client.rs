//! HTTP client for the OpenRouter API (OpenAI-compatible surface).

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::OpenRouterError;
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelListResponse,
};

/// Production OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/";

/// Output budget for extraction completions.
const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Static model list used when live listing fails.
///
/// Callers fall back to these rather than surfacing a model-listing failure
/// to the user.
#[must_use]
pub fn default_models() -> Vec<String> {
    [
        "mistralai/mistral-7b-instruct",
        "google/gemini-pro",
        "openai/gpt-3.5-turbo",
        "openai/gpt-4",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}

/// Client for the OpenRouter API.
///
/// Use [`OpenRouterClient::new`] for production or
/// [`OpenRouterClient::with_base_url`] to point at a mock server in tests.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl OpenRouterClient {
    /// Creates a new client pointed at the production OpenRouter API.
    ///
    /// # Errors
    ///
    /// Returns [`OpenRouterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, OpenRouterError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OpenRouterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OpenRouterError::Api`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OpenRouterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adscout/0.1 (channel-link-extraction)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| OpenRouterError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends a single-message chat completion with deterministic sampling
    /// (temperature 0) and returns the first choice's message content.
    ///
    /// Returns `Ok(None)` when the response carries no content — callers
    /// decide how to degrade. The raw response body is logged at info level.
    ///
    /// # Errors
    ///
    /// - [`OpenRouterError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OpenRouterError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn chat_completion(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Option<String>, OpenRouterError> {
        let url = self.endpoint("chat/completions")?;
        let request = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        tracing::info!(model, response = %body, "OpenRouter response");

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| OpenRouterError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    /// Lists available model IDs, sorted ascending.
    ///
    /// # Errors
    ///
    /// - [`OpenRouterError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OpenRouterError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_models(&self) -> Result<Vec<String>, OpenRouterError> {
        let url = self.endpoint("models")?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: ModelListResponse =
            serde_json::from_str(&body).map_err(|e| OpenRouterError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        let mut ids: Vec<String> = parsed.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }

    fn endpoint(&self, path: &str) -> Result<Url, OpenRouterError> {
        self.base_url
            .join(path)
            .map_err(|e| OpenRouterError::Api(format!("invalid endpoint '{path}': {e}")))
    }
}
