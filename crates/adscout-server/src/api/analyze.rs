//! Channel analysis endpoints: JSON report and spreadsheet export.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use adscout_core::LlmCredentials;
use adscout_extract::{process_records, report_to_xlsx, LlmContext, Report, ResultRow};
use adscout_openrouter::OpenRouterClient;
use adscout_youtube::{YoutubeClient, YoutubeError};

use crate::api::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const MAX_VIDEOS_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub channel_url: String,
    #[serde(default = "default_max_videos")]
    pub max_videos: usize,
    pub youtube_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: Option<String>,
    pub concurrency: Option<usize>,
}

fn default_max_videos() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct AnalyzeData {
    pub rows: Vec<ResultRow>,
    pub row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

enum PipelineError {
    MissingYoutubeKey,
    Youtube(YoutubeError),
    OpenRouter(adscout_openrouter::OpenRouterError),
}

impl PipelineError {
    fn into_api_error(self, request_id: String) -> ApiError {
        match self {
            Self::MissingYoutubeKey => ApiError::new(
                request_id,
                "validation_error",
                "a YouTube API key is required; supply youtube_api_key or set YOUTUBE_API_KEY",
            ),
            Self::Youtube(YoutubeError::BadChannelUrl(url)) => ApiError::new(
                request_id,
                "validation_error",
                format!("can't parse YouTube channel URL: {url}"),
            ),
            Self::Youtube(YoutubeError::ChannelNotFound(query)) => ApiError::new(
                request_id,
                "not_found",
                format!("no channel found for: {query}"),
            ),
            Self::Youtube(e) => {
                tracing::error!(error = %e, "YouTube request failed");
                ApiError::new(request_id, "upstream_error", "YouTube request failed")
            }
            Self::OpenRouter(e) => {
                tracing::error!(error = %e, "OpenRouter client construction failed");
                ApiError::new(
                    request_id,
                    "internal_error",
                    "could not initialize the LLM client",
                )
            }
        }
    }
}

/// Analyze a channel's recent uploads and return the report as JSON rows.
pub async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match run_pipeline(&state, &request).await {
        Ok(Some(report)) => {
            let row_count = report.len();
            let data = AnalyzeData {
                rows: report.rows,
                row_count,
                message: None,
            };
            (
                StatusCode::OK,
                Json(ApiResponse {
                    data,
                    meta: ResponseMeta::new(req_id.0),
                }),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: AnalyzeData {
                    rows: vec![],
                    row_count: 0,
                    message: Some("no videos found for this channel".into()),
                },
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Err(e) => e.into_api_error(req_id.0).into_response(),
    }
}

/// Analyze a channel and return the report as an `.xlsx` attachment.
pub async fn export(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let report: Report = match run_pipeline(&state, &request).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            return ApiError::new(req_id.0, "not_found", "no rows to export").into_response();
        }
        Err(e) => return e.into_api_error(req_id.0).into_response(),
    };

    match report_to_xlsx(&report) {
        Ok(bytes) => {
            let filename = format!("adscout_{}.xlsx", Utc::now().format("%Y-%m-%d"));
            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                            .to_owned(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "xlsx export failed");
            ApiError::new(req_id.0, "internal_error", "spreadsheet export failed").into_response()
        }
    }
}

/// Fetch records and run the extraction pipeline with request-level overrides
/// applied over the ambient config.
async fn run_pipeline(
    state: &AppState,
    request: &AnalyzeRequest,
) -> Result<Option<Report>, PipelineError> {
    let config = &state.config;

    let youtube_key = request
        .youtube_api_key
        .as_deref()
        .or(config.youtube_api_key.as_deref())
        .filter(|k| !k.is_empty())
        .ok_or(PipelineError::MissingYoutubeKey)?;

    let youtube = YoutubeClient::with_base_url(
        youtube_key,
        config.request_timeout_secs,
        &state.youtube_base_url,
    )
    .map_err(PipelineError::Youtube)?;

    let max_videos = request.max_videos.clamp(1, MAX_VIDEOS_LIMIT);
    let records = youtube
        .recent_videos(&request.channel_url, max_videos)
        .await
        .map_err(PipelineError::Youtube)?;

    let credentials = LlmCredentials::from_parts(
        request
            .openrouter_api_key
            .as_deref()
            .or(config.openrouter_api_key.as_deref()),
        request
            .openrouter_model
            .as_deref()
            .or(config.openrouter_model.as_deref()),
    );

    let llm_client = match &credentials {
        Some(creds) => Some(
            OpenRouterClient::with_base_url(
                &creds.api_key,
                config.request_timeout_secs,
                &state.openrouter_base_url,
            )
            .map_err(PipelineError::OpenRouter)?,
        ),
        None => None,
    };

    let llm = match (&llm_client, &credentials) {
        (Some(client), Some(creds)) => Some(LlmContext {
            client,
            model: &creds.model,
        }),
        _ => None,
    };

    let concurrency = request.concurrency.unwrap_or(config.concurrency);
    Ok(process_records(records, llm, concurrency).await)
}
