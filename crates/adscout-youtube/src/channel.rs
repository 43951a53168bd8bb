//! Channel URL parsing.

use crate::error::YoutubeError;

/// An identifier extracted from a channel URL, before API resolution.
///
/// Only `/channel/<id>` URLs carry a raw channel ID; the other forms need a
/// lookup call to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Raw `UC...` channel ID from a `/channel/` URL.
    Id(String),
    /// Legacy `/user/<name>` URL.
    User(String),
    /// Legacy `/c/<custom-name>` URL.
    Custom(String),
    /// Modern `/@handle` URL.
    Handle(String),
}

impl ChannelRef {
    /// Parse a channel URL into a [`ChannelRef`].
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::BadChannelUrl`] when the URL is not a
    /// recognizable `youtube.com` channel URL.
    pub fn parse(channel_url: &str) -> Result<Self, YoutubeError> {
        if !channel_url.contains("youtube.com/") {
            return Err(YoutubeError::BadChannelUrl(channel_url.to_owned()));
        }
        if let Some(id) = segment_after(channel_url, "/channel/") {
            return Ok(Self::Id(id));
        }
        if let Some(name) = segment_after(channel_url, "/user/") {
            return Ok(Self::User(name));
        }
        if let Some(name) = segment_after(channel_url, "/c/") {
            return Ok(Self::Custom(name));
        }
        if let Some(handle) = segment_after(channel_url, "/@") {
            return Ok(Self::Handle(handle));
        }
        Err(YoutubeError::BadChannelUrl(channel_url.to_owned()))
    }
}

/// The first path segment after `marker`, if present and non-empty.
fn segment_after(url: &str, marker: &str) -> Option<String> {
    let rest = url.split_once(marker)?.1;
    let segment = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_owned())
    }
}
