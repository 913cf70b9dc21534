//! HTTP surface for docugem.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `GET /ask` – Minimal HTML upload form for manual use from a browser.
//! - `POST /ask` – Accept a prompt and/or an uploaded document (multipart or
//!   JSON), extract text from the document when present, and forward the
//!   combined text to the Gemini gateway. Returns `{"response": string}`.
//! - `POST /summarize` – Require an uploaded document, extract its text, and
//!   ask the gateway for a summary. Returns `{"summary": string}`.
//! - `GET /models` – List model identifiers available from the provider.
//!
//! Client input problems surface as 400 responses with an `{"error": string}`
//! body; unexpected failures surface as 500 with the same shape. Gateway
//! failures on the ask/summarize paths are absorbed into the fixed fallback
//! string and still return 200.

use crate::extract::{self, ExtractError};
use crate::gemini::PromptGateway;
use axum::{
    Json, RequestExt, Router,
    extract::{Multipart, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Maximum number of characters forwarded to the gateway per request.
pub const MAX_PROMPT_CHARS: usize = 15_000;

/// Upper bound on JSON request bodies.
const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

const ASK_FORM: &str = r#"<form method="post" enctype="multipart/form-data" action="/ask">
    <input name="prompt" placeholder="Ask something" style="width:300px;" />
    <input type="file" name="file" />
    <input type="submit" />
</form>"#;

/// Build the HTTP router exposing the prompt-gateway API surface.
pub fn create_router<S>(gateway: Arc<S>) -> Router
where
    S: PromptGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/ask", get(ask_form).post(ask::<S>))
        .route("/summarize", post(summarize::<S>))
        .route("/models", get(list_models::<S>))
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// Uploaded document captured from a multipart field.
struct UploadedFile {
    filename: String,
    content: Vec<u8>,
}

/// JSON request body accepted by `POST /ask`.
#[derive(Deserialize)]
struct AskBody {
    #[serde(default)]
    prompt: Option<String>,
}

/// Success response for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    response: String,
}

/// Success response for `POST /summarize`.
#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
}

/// Success response for `GET /models`.
#[derive(Serialize)]
struct ModelsResponse {
    models: Vec<String>,
}

/// Uniform error body shared by every non-2xx response.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Serve the upload form for manual interaction.
async fn ask_form() -> Html<&'static str> {
    Html(ASK_FORM)
}

/// Forward a prompt, optionally enriched with extracted document text, to the
/// gateway.
async fn ask<S>(
    State(gateway): State<Arc<S>>,
    request: Request,
) -> Result<Json<AskResponse>, AppError>
where
    S: PromptGateway,
{
    let (prompt, upload) = read_prompt_request(request).await?;

    let content = match upload {
        Some(file) => match extract::extract(&file.filename, &file.content).await {
            Ok(text) => text,
            Err(ExtractError::UnsupportedFormat { .. }) => {
                return Err(AppError::client("Unsupported file type."));
            }
            Err(err) => return Err(AppError::internal(err.to_string())),
        },
        None => String::new(),
    };

    let full_prompt = combine_prompt(&prompt, &content);
    let response = gateway.ask(&full_prompt).await;
    tracing::info!(
        prompt_chars = full_prompt.chars().count(),
        "Ask request completed"
    );
    Ok(Json(AskResponse { response }))
}

/// Summarize an uploaded document through the gateway.
async fn summarize<S>(
    State(gateway): State<Arc<S>>,
    request: Request,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: PromptGateway,
{
    if !is_multipart(&request) {
        return Err(AppError::client("No file part in the request"));
    }
    let mut multipart = request
        .extract::<Multipart, _>()
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    let mut file_field_seen = false;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::internal(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_field_seen = true;
            let filename = field.file_name().unwrap_or_default().to_string();
            let content = field
                .bytes()
                .await
                .map_err(|err| AppError::internal(err.to_string()))?;
            if !filename.is_empty() {
                upload = Some(UploadedFile {
                    filename,
                    content: content.to_vec(),
                });
            }
        }
    }

    if !file_field_seen {
        return Err(AppError::client("No file part in the request"));
    }
    let Some(file) = upload else {
        return Err(AppError::client("No file selected"));
    };

    let content = match extract::extract(&file.filename, &file.content).await {
        Ok(text) => text,
        Err(ExtractError::UnsupportedFormat { .. }) => {
            return Err(AppError::client(
                "Unsupported file format. Upload PDF, TXT, DOCX, or image.",
            ));
        }
        Err(err) => return Err(AppError::internal(err.to_string())),
    };
    if content.trim().is_empty() {
        return Err(AppError::client("File is empty or unreadable."));
    }

    let prompt = format!(
        "Summarize the following document:\n\n{}",
        truncate_chars(content, MAX_PROMPT_CHARS)
    );
    let summary = gateway.ask(&prompt).await;
    tracing::info!(filename = %file.filename, "Summarize request completed");
    Ok(Json(SummarizeResponse { summary }))
}

/// List the model identifiers known to the provider.
async fn list_models<S>(State(gateway): State<Arc<S>>) -> Result<Json<ModelsResponse>, AppError>
where
    S: PromptGateway,
{
    let models = gateway.list_models().await.map_err(|error| {
        tracing::error!(error = %error, "Failed to list models");
        AppError::internal(error.to_string())
    })?;
    Ok(Json(ModelsResponse { models }))
}

/// Pull the prompt and optional upload out of an inbound `/ask` request,
/// accepting either multipart form data or a JSON body.
async fn read_prompt_request(request: Request) -> Result<(String, Option<UploadedFile>), AppError> {
    if is_multipart(&request) {
        let multipart = request
            .extract::<Multipart, _>()
            .await
            .map_err(|err| AppError::internal(err.to_string()))?;
        return read_multipart_fields(multipart).await;
    }

    let bytes = axum::body::to_bytes(request.into_body(), JSON_BODY_LIMIT)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;
    if bytes.is_empty() {
        return Ok((String::new(), None));
    }
    let body: AskBody =
        serde_json::from_slice(&bytes).map_err(|err| AppError::internal(err.to_string()))?;
    Ok((body.prompt.unwrap_or_default(), None))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

async fn read_multipart_fields(
    mut multipart: Multipart,
) -> Result<(String, Option<UploadedFile>), AppError> {
    let mut prompt = String::new();
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::internal(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" => {
                prompt = field
                    .text()
                    .await
                    .map_err(|err| AppError::internal(err.to_string()))?;
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::internal(err.to_string()))?;
                // A file input submitted without a selection carries no filename.
                if !filename.is_empty() {
                    upload = Some(UploadedFile {
                        filename,
                        content: content.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok((prompt, upload))
}

/// Combine the trimmed prompt with extracted document text and apply the
/// character budget.
fn combine_prompt(prompt: &str, content: &str) -> String {
    let prompt = prompt.trim();
    let combined = if content.is_empty() {
        prompt.to_string()
    } else {
        format!("{prompt}\n\n{content}")
    };
    truncate_chars(combined, MAX_PROMPT_CHARS)
}

/// Truncate to a character count, respecting UTF-8 boundaries.
fn truncate_chars(mut text: String, limit: usize) -> String {
    if let Some((index, _)) = text.char_indices().nth(limit) {
        text.truncate(index);
    }
    text
}

/// Boundary error translated into the `{"error": string}` response shape.
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn client(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
