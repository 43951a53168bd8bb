//! Model-listing endpoint with a static fallback.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Serialize;

use adscout_openrouter::{default_models, OpenRouterClient};

use crate::api::{ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct ModelsData {
    pub models: Vec<String>,
    /// `"live"` when fetched from OpenRouter, `"fallback"` for the static list.
    pub source: &'static str,
}

/// List available OpenRouter model IDs.
///
/// Listing failures degrade to the static default list rather than an error;
/// model selection should stay usable without OpenRouter connectivity.
pub async fn list_models(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let api_key = state
        .config
        .openrouter_api_key
        .clone()
        .unwrap_or_default();

    let data = match fetch_models(&state, &api_key).await {
        Ok(models) if !models.is_empty() => ModelsData {
            models,
            source: "live",
        },
        Ok(_) => {
            tracing::warn!("model listing returned no models; using defaults");
            ModelsData {
                models: default_models(),
                source: "fallback",
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "model listing failed; using defaults");
            ModelsData {
                models: default_models(),
                source: "fallback",
            }
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

async fn fetch_models(
    state: &AppState,
    api_key: &str,
) -> Result<Vec<String>, adscout_openrouter::OpenRouterError> {
    let client = OpenRouterClient::with_base_url(
        api_key,
        state.config.request_timeout_secs,
        &state.openrouter_base_url,
    )?;
    client.list_models().await
}
