//! HTTP API for the browser front-end.
//!
//! Serves the index page and static assets, and exposes the insight and PDF
//! export endpoints. Errors are returned as `{"detail": "..."}`.

use crate::config::Settings;
use crate::error::GleanError;
use crate::orchestrator::{InsightsResult, Orchestrator, PdfRequest};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state. Immutable after startup.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, settings: &Settings) -> Self {
        Self {
            orchestrator,
            templates_dir: settings.templates_dir(),
            static_dir: settings.static_dir(),
            cors_origins: settings.server.cors_origins.clone(),
        }
    }
}

/// Body of `POST /get-insights`.
#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub video_url: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// A pipeline error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GleanError);

impl From<GleanError> for ApiError {
    fn from(e: GleanError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            GleanError::InvalidUrl => StatusCode::BAD_REQUEST,
            GleanError::TranscriptNotFound | GleanError::TranscriptEmpty => StatusCode::NOT_FOUND,
            GleanError::TranscriptsDisabled => StatusCode::FORBIDDEN,
            GleanError::TranscriptFetch(_)
            | GleanError::GenerationFailed
            | GleanError::Generation(_)
            | GleanError::Render(_)
            | GleanError::Metadata(_)
            | GleanError::Config(_)
            | GleanError::Io(_)
            | GleanError::Json(_)
            | GleanError::TomlParse(_)
            | GleanError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = build_cors(&state.cors_origins);
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/get-insights", post(get_insights))
        .route("/download-pdf", post(download_pdf))
        .nest_service("/static", assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Handlers ===

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let path = state.templates_dir.join("index.html");
    let page = tokio::fs::read_to_string(&path).await.map_err(|e| {
        GleanError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(Html(page))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_insights(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VideoRequest>,
) -> Result<Json<InsightsResult>, ApiError> {
    let result = state.orchestrator.generate_insights(&req.video_url).await?;
    Ok(Json(result))
}

async fn download_pdf(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PdfRequest>,
) -> Result<Response, ApiError> {
    let doc = state.orchestrator.export_pdf(&req).await?;

    let disposition = HeaderValue::from_str(&doc.content_disposition())
        .map_err(|e| GleanError::Render(format!("Invalid download file name: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationError;
    use crate::orchestrator::testing::*;
    use crate::render::RenderError;
    use crate::transcript::TranscriptError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn router(fakes: &Fakes, dir: &Path) -> Router {
        build_router(Arc::new(AppState {
            orchestrator: fakes.orchestrator(),
            templates_dir: dir.to_path_buf(),
            static_dir: dir.to_path_buf(),
            cors_origins: Vec::new(),
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    async fn insights_with(fakes: &Fakes, url: &str) -> (StatusCode, serde_json::Value) {
        let dir = tempfile::tempdir().unwrap();
        let response = router(fakes, dir.path())
            .oneshot(post_json(
                "/get-insights",
                serde_json::json!({ "video_url": url }),
            ))
            .await
            .unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    #[tokio::test]
    async fn test_index_serves_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Glean</h1>").unwrap();

        let response = router(&Fakes::happy(), dir.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>Glean</h1>");
    }

    #[tokio::test]
    async fn test_index_missing_template_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(&Fakes::happy(), dir.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_static_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("script.js"), "console.log(1);").unwrap();

        let response = router(&Fakes::happy(), dir.path())
            .oneshot(
                Request::builder()
                    .uri("/static/script.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(&Fakes::happy(), dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_insights_ok() {
        let (status, json) = insights_with(&Fakes::happy(), URL).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "A Video");
        assert_eq!(json["insights"], "## Summary\nGreat.");
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_get_insights_invalid_url() {
        let fakes = Fakes::happy();
        let (status, json) = insights_with(&fakes, "not a url").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "Invalid YouTube video URL provided.");
        assert_eq!(fakes.titles.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fakes.transcripts.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fakes.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_insights_transcript_errors() {
        let cases = [
            (TranscriptError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TranscriptError::Disabled("x".into()), StatusCode::FORBIDDEN),
            (
                TranscriptError::Transport("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let mut fakes = Fakes::happy();
            fakes.transcripts = Arc::new(FakeTranscripts::new(Err(err)));

            let (status, json) = insights_with(&fakes, URL).await;
            assert_eq!(status, expected);
            assert!(json["detail"].is_string());
            assert_eq!(fakes.generator.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_get_insights_transport_detail_is_prefixed() {
        let mut fakes = Fakes::happy();
        fakes.transcripts = Arc::new(FakeTranscripts::new(Err(TranscriptError::Transport(
            "connection reset".into(),
        ))));

        let (_, json) = insights_with(&fakes, URL).await;
        assert_eq!(json["detail"], "Failed to fetch transcript: connection reset");
    }

    #[tokio::test]
    async fn test_get_insights_empty_transcript() {
        let mut fakes = Fakes::happy();
        fakes.transcripts = Arc::new(FakeTranscripts::texts(&["", "  "]));

        let (status, json) = insights_with(&fakes, URL).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["detail"], "Transcript was fetched but is empty.");
    }

    #[tokio::test]
    async fn test_get_insights_llm_errors() {
        let mut fakes = Fakes::happy();
        fakes.generator = Arc::new(FakeGenerator::new(Err(GenerationError::Empty)));
        let (status, json) = insights_with(&fakes, URL).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Failed to generate insights from the LLM.");

        fakes.generator = Arc::new(FakeGenerator::new(Err(GenerationError::Transport(
            "quota exceeded".into(),
        ))));
        let (status, json) = insights_with(&fakes, URL).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json["detail"],
            "An error occurred while generating insights: quota exceeded"
        );
    }

    #[tokio::test]
    async fn test_get_insights_title_failure_still_ok() {
        let mut fakes = Fakes::happy();
        fakes.titles = Arc::new(FakeTitles::new(Err("oEmbed 404".into())));

        let (status, json) = insights_with(&fakes, URL).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Untitled Video");
    }

    #[tokio::test]
    async fn test_get_insights_missing_field_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(&Fakes::happy(), dir.path())
            .oneshot(post_json("/get-insights", serde_json::json!({ "url": URL })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_download_pdf_ok() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(&Fakes::happy(), dir.path())
            .oneshot(post_json(
                "/download-pdf",
                serde_json::json!({ "title": "T", "markdown_content": "# Hi" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"[summarized]T.pdf\""));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!body.is_empty());
        assert_eq!(&body[..], b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_download_pdf_render_failure() {
        let mut fakes = Fakes::happy();
        fakes.renderer = Arc::new(FakeRenderer::new(Err(RenderError::ToolNotFound(
            "wkhtmltopdf".into(),
        ))));

        let dir = tempfile::tempdir().unwrap();
        let response = router(&fakes, dir.path())
            .oneshot(post_json(
                "/download-pdf",
                serde_json::json!({ "title": "T", "markdown_content": "# Hi" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let json = json_body(response).await;
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .starts_with("PDF generation failed:"));
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/get-insights")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request")
    }

    fn router_with_origins(origins: &[&str], dir: &Path) -> Router {
        build_router(Arc::new(AppState {
            orchestrator: Fakes::happy().orchestrator(),
            templates_dir: dir.to_path_buf(),
            static_dir: dir.to_path_buf(),
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
        }))
    }

    #[tokio::test]
    async fn test_cors_skips_invalid_origin_and_allows_listed_one() {
        let dir = tempfile::tempdir().unwrap();
        let app = router_with_origins(&["http://localhost:8000", "bad\norigin"], dir.path());

        let response = app
            .clone()
            .oneshot(preflight("http://localhost:8000"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8000"
        );

        let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_empty_list_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let response = router_with_origins(&[], dir.path())
            .oneshot(preflight("http://anywhere.example"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GleanError::InvalidUrl, StatusCode::BAD_REQUEST),
            (GleanError::TranscriptNotFound, StatusCode::NOT_FOUND),
            (GleanError::TranscriptEmpty, StatusCode::NOT_FOUND),
            (GleanError::TranscriptsDisabled, StatusCode::FORBIDDEN),
            (
                GleanError::TranscriptFetch("reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GleanError::GenerationFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (
                GleanError::Render("crashed".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GleanError::Config("no template".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
