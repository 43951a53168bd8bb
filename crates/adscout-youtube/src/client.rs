//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with typed response deserialization and the small set of
//! endpoints needed to list a channel's recent uploads: channel lookup,
//! uploads-playlist resolution, paginated playlist listing, and video
//! snippet fetches.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::channel::ChannelRef;
use crate::error::YoutubeError;
use crate::types::{
    ChannelListResponse, PlaylistItemsResponse, VideoListResponse, VideoRecord,
};

/// Production Data API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// `videos.list` accepts at most 50 IDs per call.
const VIDEO_ID_CHUNK: usize = 50;

/// Client for the `YouTube` Data API v3.
///
/// Manages the HTTP client, API key, and base URL. Use [`YoutubeClient::new`]
/// for production or [`YoutubeClient::with_base_url`] to point at a mock
/// server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production Data API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adscout/0.1 (channel-link-extraction)")
            .build()?;

        // Normalise: the base URL must end with a slash so join() appends the
        // endpoint as a path segment instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| YoutubeError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a channel URL to a raw channel ID.
    ///
    /// `/channel/` URLs resolve without a network call; handle, user, and
    /// custom URLs go through `channels.list(forHandle=...)`.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::BadChannelUrl`] if the URL cannot be parsed.
    /// - [`YoutubeError::ChannelNotFound`] if the lookup returns no items.
    /// - [`YoutubeError::Http`] / [`YoutubeError::Deserialize`] on transport
    ///   or payload failures.
    pub async fn resolve_channel_id(&self, channel_url: &str) -> Result<String, YoutubeError> {
        let query = match ChannelRef::parse(channel_url)? {
            ChannelRef::Id(id) => {
                tracing::info!(channel_id = %id, "channel ID found directly in URL");
                return Ok(id);
            }
            ChannelRef::Handle(handle) => format!("@{handle}"),
            ChannelRef::User(name) | ChannelRef::Custom(name) => name,
        };

        tracing::info!(query = %query, "looking up channel ID");
        let url = self.build_url("channels", &[("part", "id"), ("forHandle", &query)])?;
        let body: ChannelListResponse = self.request_json(&url).await?;

        let id = body
            .items
            .into_iter()
            .find_map(|item| item.id)
            .ok_or_else(|| YoutubeError::ChannelNotFound(query.clone()))?;
        tracing::info!(channel_id = %id, "resolved channel ID");
        Ok(id)
    }

    /// Fetches the ID of the channel's uploads playlist.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if the channel has no entry.
    /// - [`YoutubeError::Http`] / [`YoutubeError::Deserialize`] on transport
    ///   or payload failures.
    pub async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[("part", "contentDetails"), ("id", channel_id)],
        )?;
        let body: ChannelListResponse = self.request_json(&url).await?;

        body.items
            .into_iter()
            .find_map(|item| item.content_details)
            .map(|details| details.related_playlists.uploads)
            .ok_or_else(|| YoutubeError::ChannelNotFound(channel_id.to_owned()))
    }

    /// Lists up to `max_results` video IDs from a playlist, newest first.
    ///
    /// Follows `nextPageToken` pagination with page sizes of
    /// `min(50, remaining)` until `max_results` IDs are collected or the
    /// playlist is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] / [`YoutubeError::Deserialize`] on
    /// transport or payload failures.
    pub async fn list_recent_video_ids(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<String>, YoutubeError> {
        let mut video_ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;

        while video_ids.len() < max_results {
            let remaining = max_results - video_ids.len();
            let page_size = remaining.min(50).to_string();
            let mut params: Vec<(&str, &str)> = vec![
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", &page_size),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let url = self.build_url("playlistItems", &params)?;
            let body: PlaylistItemsResponse = self.request_json(&url).await?;
            tracing::debug!(
                playlist_id = %playlist_id,
                page_items = body.items.len(),
                remaining,
                "fetched playlist page"
            );

            for item in body.items {
                video_ids.push(item.snippet.resource_id.video_id);
                if video_ids.len() >= max_results {
                    break;
                }
            }

            page_token = body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        tracing::info!(total = video_ids.len(), "collected video IDs");
        Ok(video_ids)
    }

    /// Fetches snippet metadata for the given video IDs, preserving API
    /// return order.
    ///
    /// IDs are requested in chunks of 50 (the `videos.list` maximum). Records
    /// with empty descriptions are kept; the extraction pipeline substitutes
    /// empty results for them without an LLM call.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] / [`YoutubeError::Deserialize`] on
    /// transport or payload failures.
    pub async fn fetch_video_records(
        &self,
        video_ids: &[String],
    ) -> Result<Vec<VideoRecord>, YoutubeError> {
        let mut records: Vec<VideoRecord> = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(VIDEO_ID_CHUNK) {
            let joined = chunk.join(",");
            let url = self.build_url("videos", &[("part", "snippet"), ("id", &joined)])?;
            let body: VideoListResponse = self.request_json(&url).await?;

            for item in body.items {
                records.push(VideoRecord {
                    url: format!("https://www.youtube.com/watch?v={}", item.id),
                    video_id: item.id,
                    published_at: item.snippet.published_at,
                    title: item.snippet.title,
                    description: item.snippet.description,
                });
            }
        }

        tracing::info!(total = records.len(), "fetched video records");
        Ok(records)
    }

    /// Lists a channel's most recent uploads as full [`VideoRecord`]s.
    ///
    /// Composes channel resolution, uploads-playlist lookup, ID listing, and
    /// snippet fetching.
    ///
    /// # Errors
    ///
    /// Propagates any error from the composed calls.
    pub async fn recent_videos(
        &self,
        channel_url: &str,
        max_results: usize,
    ) -> Result<Vec<VideoRecord>, YoutubeError> {
        let channel_id = self.resolve_channel_id(channel_url).await?;
        let playlist_id = self.uploads_playlist_id(&channel_id).await?;
        let video_ids = self.list_recent_video_ids(&playlist_id, max_results).await?;
        self.fetch_video_records(&video_ids).await
    }

    /// Builds the full request URL for an endpoint with the API key and
    /// properly percent-encoded query parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| YoutubeError::Api(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON into `T`.
    async fn request_json<T>(&self, url: &Url) -> Result<T, YoutubeError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}
