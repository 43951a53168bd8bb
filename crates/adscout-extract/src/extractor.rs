//! Best-effort link/brand extraction from one description.
//!
//! The LLM path asks for a two-key JSON object and parses it defensively; any
//! failure along that path degrades to a regex scan for the first URL in the
//! raw text. This function never returns an error.

use std::sync::LazyLock;

use adscout_openrouter::OpenRouterClient;
use regex::Regex;

use crate::types::BrandInfo;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid regex"));

/// Borrowed LLM access for one extraction batch: a client plus the model to
/// query. `None` means extraction is disabled and results stay empty.
#[derive(Clone, Copy)]
pub struct LlmContext<'a> {
    pub client: &'a OpenRouterClient,
    pub model: &'a str,
}

/// Extract an advertising link and brand name from a video description.
///
/// Behavior:
/// - empty description → empty [`BrandInfo`], no calls made;
/// - no LLM context → empty [`BrandInfo`] (extraction requires a configured
///   model; the regex fallback is not attempted in this path);
/// - otherwise, one chat completion asking for a `{"url", "brand"}` JSON
///   object; a missing, malformed, or incomplete reply falls back to the
///   first URL-looking substring of the description.
///
/// Never fails: every error is logged and converted into a degraded result.
pub async fn extract_brand_info(llm: Option<LlmContext<'_>>, description: &str) -> BrandInfo {
    if description.is_empty() {
        tracing::warn!("empty description provided for brand extraction");
        return BrandInfo::default();
    }
    let Some(ctx) = llm else {
        return BrandInfo::default();
    };

    match ctx
        .client
        .chat_completion(ctx.model, &build_prompt(description))
        .await
    {
        Ok(Some(content)) => {
            if let Some(info) = parse_brand_json(&content) {
                return info;
            }
            tracing::error!("completion did not contain a usable brand JSON object");
        }
        Ok(None) => {
            tracing::error!("empty completion from OpenRouter");
        }
        Err(e) => {
            tracing::error!(error = %e, "error extracting brand");
        }
    }

    regex_fallback(description)
}

/// First `http(s)://` substring of `text`, if any.
#[must_use]
pub fn first_link(text: &str) -> Option<&str> {
    LINK_RE.find(text).map(|m| m.as_str())
}

fn build_prompt(description: &str) -> String {
    format!(
        "Extract the advertising link and brand from the text. \
         Reply only with a valid JSON object with the keys \"url\" and \"brand\".\n\
         Text:\n{description}"
    )
}

/// Parse the completion text as a `{"url", "brand"}` object.
///
/// Models often wrap the object in prose or code fences, so this slices from
/// the first `{` to the last `}` before parsing. Any violation — no braces,
/// malformed JSON, not an object, missing keys, non-string values — is one
/// uniform failure returning `None`.
fn parse_brand_json(content: &str) -> Option<BrandInfo> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    let candidate = content.get(start..=end)?;

    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;
    let url = object.get("url")?.as_str()?;
    let brand = object.get("brand")?.as_str()?;
    Some(BrandInfo {
        url: url.to_owned(),
        brand: brand.to_owned(),
    })
}

fn regex_fallback(description: &str) -> BrandInfo {
    BrandInfo {
        url: first_link(description).unwrap_or_default().to_owned(),
        brand: String::new(),
    }
}
