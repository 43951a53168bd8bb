//! `YouTube` Data API v3 client: channel resolution and recent-upload listing.

mod channel;
mod client;
mod error;
mod types;

pub use channel::ChannelRef;
pub use client::{YoutubeClient, DEFAULT_BASE_URL};
pub use error::YoutubeError;
pub use types::VideoRecord;
