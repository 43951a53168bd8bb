mod analyze;
mod models;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use adscout_core::AppConfig;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Base URLs are injectable so route tests can point the pipeline at
    /// wiremock servers.
    pub youtube_base_url: Arc<str>,
    pub openrouter_base_url: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            youtube_base_url: Arc::from(adscout_youtube::DEFAULT_BASE_URL),
            openrouter_base_url: Arc::from(adscout_openrouter::DEFAULT_BASE_URL),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/models", get(models::list_models))
        .route("/api/v1/analyze", post(analyze::analyze))
        .route("/api/v1/analyze/export", post(analyze::export))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> AppConfig {
        AppConfig {
            youtube_api_key: None,
            openrouter_api_key: None,
            openrouter_model: None,
            concurrency: 4,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".into(),
            request_timeout_secs: 5,
        }
    }

    fn test_state(youtube_base: &str, openrouter_base: &str) -> AppState {
        AppState {
            config: Arc::new(test_config()),
            youtube_base_url: Arc::from(youtube_base),
            openrouter_base_url: Arc::from(openrouter_base),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    /// Mounts the four YouTube endpoints for a channel with two uploads, the
    /// first with a sponsored description and the second with an empty one.
    async fn mount_channel(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": "UCabc123",
                        "contentDetails": { "relatedPlaylists": { "uploads": "UUabc123" } }
                    }
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "snippet": { "resourceId": { "videoId": "vid-1" } } },
                    { "snippet": { "resourceId": { "videoId": "vid-2" } } }
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": "vid-1",
                        "snippet": {
                            "publishedAt": "2025-06-01T10:00:00Z",
                            "title": "Video One",
                            "description": "Check out https://example.com"
                        }
                    },
                    {
                        "id": "vid-2",
                        "snippet": {
                            "publishedAt": "2025-06-02T10:00:00Z",
                            "title": "Video Two",
                            "description": ""
                        }
                    }
                ]
            })))
            .mount(server)
            .await;
    }

    fn analyze_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_returns_ok_with_request_id_header() {
        let app = build_app(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn analyze_without_youtube_key_is_a_validation_error() {
        let app = build_app(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze",
                serde_json::json!({ "channel_url": "https://www.youtube.com/@somehandle" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn analyze_with_bad_channel_url_is_a_validation_error() {
        let app = build_app(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze",
                serde_json::json!({
                    "channel_url": "https://www.google.com",
                    "youtube_api_key": "yt-key"
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn analyze_returns_sorted_rows_without_llm_credentials() {
        let youtube = MockServer::start().await;
        mount_channel(&youtube).await;

        let app = build_app(test_state(&youtube.uri(), "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze",
                serde_json::json!({
                    "channel_url": "https://www.youtube.com/channel/UCabc123",
                    "youtube_api_key": "yt-key",
                    "max_videos": 2
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["row_count"], 2);
        let rows = json["data"]["rows"].as_array().expect("rows");
        // Non-empty description first despite being older; empty brand/link
        // everywhere because no LLM credentials were supplied.
        assert_eq!(rows[0]["title"], "Video One");
        assert_eq!(rows[0]["brand"], "");
        assert_eq!(rows[0]["link"], "");
        assert_eq!(rows[1]["description"], "");
    }

    #[tokio::test]
    async fn analyze_upstream_failure_maps_to_bad_gateway() {
        let youtube = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&youtube)
            .await;

        let app = build_app(test_state(&youtube.uri(), "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze",
                serde_json::json!({
                    "channel_url": "https://www.youtube.com/@somehandle",
                    "youtube_api_key": "yt-key"
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn export_returns_xlsx_attachment() {
        let youtube = MockServer::start().await;
        mount_channel(&youtube).await;

        let app = build_app(test_state(&youtube.uri(), "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze/export",
                serde_json::json!({
                    "channel_url": "https://www.youtube.com/channel/UCabc123",
                    "youtube_api_key": "yt-key",
                    "max_videos": 2
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert_eq!(
            content_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(disposition.starts_with("attachment; filename=\"adscout_"));

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[tokio::test]
    async fn export_of_empty_channel_is_not_found() {
        let youtube = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": "UCabc123",
                        "contentDetails": { "relatedPlaylists": { "uploads": "UUabc123" } }
                    }
                ]
            })))
            .mount(&youtube)
            .await;
        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
            )
            .mount(&youtube)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
            )
            .mount(&youtube)
            .await;

        let app = build_app(test_state(&youtube.uri(), "http://127.0.0.1:1"));
        let response = app
            .oneshot(analyze_request(
                "/api/v1/analyze/export",
                serde_json::json!({
                    "channel_url": "https://www.youtube.com/channel/UCabc123",
                    "youtube_api_key": "yt-key"
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn models_falls_back_to_default_list_when_listing_fails() {
        // OpenRouter base points at a closed port: listing fails, handler
        // still returns 200 with the static list.
        let app = build_app(test_state("http://127.0.0.1:1", "http://127.0.0.1:1"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/models")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["source"], "fallback");
        let models = json["data"]["models"].as_array().expect("models");
        assert!(!models.is_empty());
    }

    #[tokio::test]
    async fn models_returns_live_list_when_available() {
        let openrouter = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [ { "id": "openai/gpt-4" }, { "id": "google/gemini-pro" } ]
            })))
            .mount(&openrouter)
            .await;

        let app = build_app(test_state("http://127.0.0.1:1", &openrouter.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/models")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["source"], "live");
        assert_eq!(
            json["data"]["models"],
            serde_json::json!(["google/gemini-pro", "openai/gpt-4"])
        );
    }
}
