//! Route handlers for the résumé pipeline: upload, manual create, improve,
//! and artifact download/preview.

use axum::{
    body::{Body, Bytes},
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{self, UploadKind};
use crate::models::resume::ResumeRecord;
use crate::parse;
use crate::render::{render_resume, RenderOutcome};
use crate::state::AppState;

/// Response shape shared by upload, create, and improve.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub success: bool,
    pub parsed_data: ResumeRecord,
    pub latex_content: String,
    pub pdf_compiled: bool,
    pub tex_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl RenderResponse {
    fn from_outcome(record: ResumeRecord, outcome: RenderOutcome) -> Self {
        Self {
            success: true,
            parsed_data: record,
            pdf_compiled: outcome.pdf_compiled(),
            tex_url: format!("/download/{}", outcome.tex_filename),
            pdf_url: outcome
                .pdf_filename
                .as_ref()
                .map(|f| format!("/download/{f}")),
            preview_url: outcome
                .pdf_filename
                .as_ref()
                .map(|f| format!("/preview/{f}")),
            warning: outcome.warning(),
            latex_content: outcome.latex_source,
        }
    }
}

/// Short random prefix so concurrent requests never collide on disk.
fn fresh_base_name() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..8].to_string()
}

// ──────────────────────── POST /api/upload ────────────────────────

/// Accepts a multipart PDF/DOCX upload, extracts its text, structures it,
/// and renders the LaTeX résumé.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RenderResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Validation("Upload is missing a filename".to_string()))?
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, data));
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("No 'file' field in upload".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let kind = UploadKind::from_filename(&filename)?;
    info!(filename, bytes = data.len(), "processing upload");

    let text = extract::extract_text(kind, &data)?;
    let record = parse::parse_resume_text(&text, &state.llm).await;

    let outcome = render_resume(
        &record,
        &fresh_base_name(),
        &state.config.output_dir,
        &state.compiler,
        &state.remote,
    )
    .await?;

    Ok(Json(RenderResponse::from_outcome(record, outcome)))
}

// ──────────────────────── POST /api/create-cv ────────────────────────

/// Renders a résumé from structured data supplied directly by the client,
/// skipping extraction and LLM parsing entirely.
pub async fn handle_create(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Json<RenderResponse>, AppError> {
    let outcome = render_resume(
        &record,
        &fresh_base_name(),
        &state.config.output_dir,
        &state.compiler,
        &state.remote,
    )
    .await?;

    Ok(Json(RenderResponse::from_outcome(record, outcome)))
}

// ──────────────────────── POST /api/improve ────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub resume: ResumeRecord,
    pub feedback: String,
}

/// Re-runs a parsed résumé through the LLM with reviewer feedback, then
/// renders the improved version.
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    if req.feedback.trim().is_empty() {
        return Err(AppError::Validation("Feedback must not be empty".to_string()));
    }

    let improved = parse::improve::improve_resume(&req.resume, &req.feedback, &state.llm).await?;

    let outcome = render_resume(
        &improved,
        &fresh_base_name(),
        &state.config.output_dir,
        &state.compiler,
        &state.remote,
    )
    .await?;

    Ok(Json(RenderResponse::from_outcome(improved, outcome)))
}

// ──────────────────────── GET /download, /preview ────────────────────────

/// Serves a generated artifact as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    serve_artifact(&state, &filename, true).await
}

/// Serves a generated PDF inline for in-browser viewing.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if !filename.ends_with(".pdf") {
        return Err(AppError::Validation(
            "Preview is only available for PDF files".to_string(),
        ));
    }
    serve_artifact(&state, &filename, false).await
}

async fn serve_artifact(
    state: &AppState,
    filename: &str,
    as_attachment: bool,
) -> Result<Response, AppError> {
    if !is_safe_filename(filename) {
        return Err(AppError::Validation("Invalid filename".to_string()));
    }

    let path = state.config.output_dir.join(filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("No such file: {filename}")))?;

    let content_type = if filename.ends_with(".pdf") {
        "application/pdf"
    } else {
        "text/x-tex; charset=utf-8"
    };
    let disposition = if as_attachment {
        format!("attachment; filename=\"{filename}\"")
    } else {
        "inline".to_string()
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}

/// Rejects anything that could escape the output directory. Generated
/// filenames only ever contain hex, underscores, and an extension.
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && !filename.contains("..")
}
