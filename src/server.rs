//! HTTP surface: an axum router over the generation flows.
//!
//! | Method | Path                     | Body → Response                       |
//! |--------|--------------------------|---------------------------------------|
//! | POST   | `/generate`              | note + evidence → `{content, quiz}`   |
//! | POST   | `/api/ai/quiz/generate`  | note + evidence → `{quiz}`            |
//! | GET    | `/health`                | → `{status: "ok"}`                    |
//!
//! Every failure is a 400 with `{"error": <message>}`. Messages are generic;
//! the underlying [`NoteError`] is logged, never returned.

use crate::config::ServiceConfig;
use crate::error::NoteError;
use crate::generate::{quiz_for_note, study_pack};
use crate::model::{NoteRequest, QuizItem};
use crate::pipeline::fetch::AssetFetcher;
use crate::pipeline::llm::Generator;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const MSG_MISSING_EVIDENCE: &str = "imageUrls or pdfUrl is required";
const MSG_GENERATE_FAILED: &str = "Image download or conversion failed";
const MSG_QUIZ_FAILED: &str = "퀴즈 생성 실패";
const MSG_BAD_BODY: &str = "Invalid request body";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub fetcher: Arc<AssetFetcher>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Build state from a config and a generator; the fetcher is derived
    /// from the config.
    pub fn new(config: ServiceConfig, generator: Arc<dyn Generator>) -> Result<Self, NoteError> {
        let fetcher = AssetFetcher::new(&config)?;
        Ok(Self {
            generator,
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        })
    }
}

/// Body of `POST /generate`.
///
/// The notes backend sends `null` for absent fields, so everything is
/// optional and an explicit `null` means the same as a missing key.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub description: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub pdf_url: Option<String>,
    pub note_id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub keywords: Option<serde_json::Value>,
}

/// Body of `POST /api/ai/quiz/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuizRequest {
    pub note_text: Option<String>,
    #[serde(rename = "imageUrls")]
    pub image_urls: Option<Vec<String>>,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
    pub quiz: Vec<QuizItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub quiz: Vec<QuizItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A 400 carrying a generic message.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.message.to_string(),
            }),
        )
            .into_response()
    }
}

fn note_request(
    note_text: Option<String>,
    image_urls: Option<Vec<String>>,
    pdf_url: Option<String>,
) -> NoteRequest {
    let request =
        NoteRequest::new(note_text.unwrap_or_default()).with_images(image_urls.unwrap_or_default());
    match pdf_url {
        Some(pdf) => request.with_pdf(pdf),
        None => request,
    }
}

/// Coarse failure class used in log lines.
fn failure_kind(err: &NoteError) -> &'static str {
    match err {
        NoteError::MissingEvidence => "no evidence supplied",
        e if e.is_unavailable() => "evidence unavailable",
        _ => "generation failed",
    }
}

fn log_failure(route: &str, err: &NoteError) {
    let kind = failure_kind(err);
    warn!(kind, "{} {}: {}", route, kind, err);
}

fn bad_body(route: &str, rejection: JsonRejection) -> ApiError {
    warn!("{} rejected body: {}", route, rejection.body_text());
    ApiError {
        message: MSG_BAD_BODY,
    }
}

/// Build the router with all endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/api/ai/quiz/generate", post(generate_quiz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = body.map_err(|r| bad_body("/generate", r))?;
    info!(
        note_id = ?body.note_id,
        title = body.title.as_deref().unwrap_or(""),
        images = body.image_urls.as_ref().map_or(0, Vec::len),
        pdf = body.pdf_url.is_some(),
        "POST /generate"
    );

    let request = note_request(body.description, body.image_urls, body.pdf_url);
    let pack = study_pack(
        &request,
        &state.fetcher,
        state.generator.as_ref(),
        state.config.pdfium_lib_path.clone(),
    )
    .await
    .map_err(|e| {
        log_failure("/generate", &e);
        match e {
            NoteError::MissingEvidence => ApiError {
                message: MSG_MISSING_EVIDENCE,
            },
            _ => ApiError {
                message: MSG_GENERATE_FAILED,
            },
        }
    })?;

    Ok(Json(GenerateResponse {
        content: pack.summary,
        quiz: pack.quiz,
    }))
}

async fn generate_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let Json(body) = body.map_err(|r| bad_body("/api/ai/quiz/generate", r))?;
    info!(
        images = body.image_urls.as_ref().map_or(0, Vec::len),
        pdf = body.pdf_url.is_some(),
        "POST /api/ai/quiz/generate"
    );

    let request = note_request(body.note_text, body.image_urls, body.pdf_url);
    let quiz = quiz_for_note(
        &request,
        &state.fetcher,
        state.generator.as_ref(),
        state.config.pdfium_lib_path.clone(),
    )
    .await
    .map_err(|e| {
        log_failure("/api/ai/quiz/generate", &e);
        ApiError {
            message: MSG_QUIZ_FAILED,
        }
    })?;

    Ok(Json(QuizResponse { quiz }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_accepts_extra_fields_and_defaults() {
        let body: GenerateRequest = serde_json::from_str(
            r#"{"description": "d", "noteId": 7, "title": "OS", "keywords": ["paging"], "imageUrls": ["/a.png"]}"#,
        )
        .unwrap();
        assert_eq!(body.description.as_deref(), Some("d"));
        assert_eq!(body.image_urls, Some(vec!["/a.png".to_string()]));
        assert!(body.pdf_url.is_none());
        assert_eq!(body.note_id, Some(serde_json::json!(7)));

        let empty: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.description.is_none());
        assert!(empty.image_urls.is_none());
    }

    #[test]
    fn explicit_nulls_read_as_absent() {
        let body: GenerateRequest = serde_json::from_str(
            r#"{"description": null, "imageUrls": null, "pdfUrl": null, "noteId": null, "title": null, "keywords": null}"#,
        )
        .unwrap();
        let request = note_request(body.description, body.image_urls, body.pdf_url);
        assert!(request.note_text.is_empty());
        assert!(request.image_refs.is_empty());
        assert!(!request.has_evidence());

        let body: QuizRequest =
            serde_json::from_str(r#"{"note_text": null, "imageUrls": null, "pdfUrl": null}"#)
                .unwrap();
        assert!(body.note_text.is_none());
        assert!(body.image_urls.is_none());
    }

    #[test]
    fn failure_kind_separates_evidence_from_generation() {
        assert_eq!(failure_kind(&NoteError::MissingEvidence), "no evidence supplied");
        assert_eq!(failure_kind(&NoteError::EmptyPdf), "evidence unavailable");
        assert_eq!(
            failure_kind(&NoteError::DownloadFailed {
                url: "http://files/a.pdf".into(),
                reason: "HTTP 404 Not Found".into(),
            }),
            "evidence unavailable"
        );
        assert_eq!(
            failure_kind(&NoteError::GenerationFailed {
                message: "quota".into()
            }),
            "generation failed"
        );
    }

    #[test]
    fn quiz_request_uses_snake_case_note_text() {
        let body: QuizRequest =
            serde_json::from_str(r#"{"note_text": "n", "pdfUrl": "/f.pdf"}"#).unwrap();
        assert_eq!(body.note_text.as_deref(), Some("n"));
        assert_eq!(body.pdf_url.as_deref(), Some("/f.pdf"));
    }

    #[test]
    fn note_request_keeps_both_sources() {
        let request = note_request(
            Some("t".into()),
            Some(vec!["/a.png".into()]),
            Some("/f.pdf".into()),
        );
        assert_eq!(request.image_refs, ["/a.png"]);
        assert_eq!(request.pdf_ref.as_deref(), Some("/f.pdf"));
    }
}
