use serde::{Deserialize, Serialize};

/// One video's metadata and description, as returned by the Data API.
///
/// `published_at` is kept as the API's RFC3339 string; downstream ordering
/// relies on its lexicographic form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub published_at: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

// Wire types below mirror the Data API v3 response shapes; only the fields we
// read are declared.

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    pub id: Option<String>,
    #[serde(rename = "contentDetails")]
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedPlaylists {
    pub uploads: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemSnippet {
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoSnippet {
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}
