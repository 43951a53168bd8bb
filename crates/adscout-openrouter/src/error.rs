use thiserror::Error;

/// Errors returned by the OpenRouter client.
#[derive(Debug, Error)]
pub enum OpenRouterError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client was misconfigured.
    #[error("OpenRouter error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
