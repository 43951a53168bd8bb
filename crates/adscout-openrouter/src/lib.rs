//! OpenRouter chat-completion and model-listing client.

mod client;
mod error;
mod types;

pub use client::{default_models, OpenRouterClient, DEFAULT_BASE_URL};
pub use error::OpenRouterError;
