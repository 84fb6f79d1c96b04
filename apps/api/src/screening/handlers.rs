//! Axum route handlers for the screening API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::job_description::ResolvedJobDescription;
use crate::models::document::UploadedDocument;
use crate::models::evaluation::{export_file_name, BatchIssue, EvaluationResult, RankedEntry};
use crate::screening::dispatcher::{run_batch, BatchRequest};
use crate::screening::prompts::EvaluationPrompt;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveJobDescriptionRequest {
    pub text: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveJobDescriptionResponse {
    pub job_description: String,
    pub warning: Option<String>,
}

impl From<ResolvedJobDescription> for ResolveJobDescriptionResponse {
    fn from(resolved: ResolvedJobDescription) -> Self {
        Self {
            job_description: resolved.text,
            warning: resolved.warning,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub mode: EvaluationPrompt,
    pub job_description: String,
    pub job_description_warning: Option<String>,
    pub results: Vec<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<RankedEntry>>,
    pub skipped: Vec<BatchIssue>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub label: String,
    pub text: String,
}

/// Form fields of an evaluation upload.
#[derive(Debug, Default)]
struct EvaluationForm {
    job_description: Option<String>,
    job_url: Option<String>,
    documents: Vec<UploadedDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/job-description
///
/// Resolves pasted text or a job URL. Never fails; problems come back as `warning`.
pub async fn handle_resolve_job_description(
    State(state): State<AppState>,
    Json(request): Json<ResolveJobDescriptionRequest>,
) -> Json<ResolveJobDescriptionResponse> {
    let resolved = state
        .job_descriptions
        .resolve(request.text.as_deref(), request.url.as_deref())
        .await;
    Json(resolved.into())
}

/// POST /api/v1/evaluations/:mode
///
/// Multipart form: `job_description`, `job_url`, and one or more `resume` files.
/// Runs the batch to completion before responding.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let prompt: EvaluationPrompt = mode.parse().map_err(AppError::Validation)?;
    let form = read_evaluation_form(multipart).await?;

    if form.documents.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one resume (PDF or Word)".to_string(),
        ));
    }

    let resolved = state
        .job_descriptions
        .resolve(form.job_description.as_deref(), form.job_url.as_deref())
        .await;

    let batch_id = Uuid::new_v4();
    let outcome = run_batch(
        state.model.as_ref(),
        BatchRequest {
            documents: form.documents,
            job_description: resolved.text.clone(),
            prompt,
        },
    )
    .instrument(info_span!("batch", %batch_id, mode = %prompt))
    .await;

    Ok(Json(BatchReport {
        batch_id,
        mode: prompt,
        job_description: resolved.text,
        job_description_warning: resolved.warning,
        results: outcome.results,
        ranking: outcome.ranking,
        skipped: outcome.skipped,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/export
///
/// Returns one evaluation as a UTF-8 text download named `{label}_analysis.txt`.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let label = request.label.trim();
    if label.is_empty() {
        return Err(AppError::Validation("label cannot be empty".to_string()));
    }

    let file_name = export_file_name(label);
    let disposition = content_disposition(&file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        request.text,
    )
        .into_response())
}

async fn read_evaluation_form(mut multipart: Multipart) -> Result<EvaluationForm, AppError> {
    let mut form = EvaluationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => form.job_description = Some(field.text().await?),
            "job_url" => form.job_url = Some(field.text().await?),
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.documents.push(UploadedDocument {
                    file_name,
                    media_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// `attachment` header with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
