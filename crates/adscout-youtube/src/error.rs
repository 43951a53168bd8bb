use thiserror::Error;

/// Errors returned by the `YouTube` Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client was misconfigured or the API returned an unusable payload.
    #[error("YouTube API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The channel URL did not match any recognized format.
    #[error("can't parse YouTube channel URL: {0}")]
    BadChannelUrl(String),

    /// The channel lookup returned no results.
    #[error("can't find channel for query: {0}")]
    ChannelNotFound(String),
}
