use std::net::SocketAddr;

/// Process-wide configuration, loaded from the environment.
///
/// API keys are optional at load time: the HTTP API accepts per-request
/// overrides, so a missing key only becomes an error when a request actually
/// needs it.
#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: Option<String>,
    pub concurrency: usize,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openrouter_model", &self.openrouter_model)
            .field("concurrency", &self.concurrency)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// LLM access settings for the extraction path.
///
/// Only constructed when both the API key and a model are known; extraction
/// without credentials degrades to empty results rather than erroring.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmCredentials {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for LlmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCredentials")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .finish()
    }
}

impl LlmCredentials {
    /// Build credentials from an optional key and model, returning `None`
    /// unless both are present and non-empty.
    #[must_use]
    pub fn from_parts(api_key: Option<&str>, model: Option<&str>) -> Option<Self> {
        match (api_key, model) {
            (Some(key), Some(model)) if !key.is_empty() && !model.is_empty() => Some(Self {
                api_key: key.to_owned(),
                model: model.to_owned(),
            }),
            _ => None,
        }
    }
}

impl AppConfig {
    /// LLM credentials from the configured key and model, if both are set.
    #[must_use]
    pub fn llm_credentials(&self) -> Option<LlmCredentials> {
        LlmCredentials::from_parts(
            self.openrouter_api_key.as_deref(),
            self.openrouter_model.as_deref(),
        )
    }
}
