//! HTTP client wrapper for the Google Gemini generative-text API.
//!
//! [`GeminiClient`] issues one call per request, awaits it to completion, and
//! never retries. Failures are typed internally ([`GeminiError`]); the
//! [`PromptGateway::ask`] boundary translates them into the fixed
//! [`GATEWAY_FALLBACK`] string so the HTTP response shape stays stable for
//! callers.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Fixed payload returned in place of a genuine model response when the
/// gateway call fails.
pub const GATEWAY_FALLBACK: &str = "An error occurred while querying Gemini.";

/// Errors returned while interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid Gemini URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Gemini responded with an unexpected status code.
    #[error("Unexpected Gemini response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the API.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Gemini responded with a payload the client could not interpret.
    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),
}

/// Interface implemented by the prompt gateway, kept narrow so handlers can be
/// tested against a stub.
#[async_trait]
pub trait PromptGateway {
    /// Forward a prompt to the model and return its textual response, or the
    /// fixed fallback string on any failure.
    async fn ask(&self, prompt: &str) -> String;

    /// List the model identifiers available from the provider.
    async fn list_models(&self) -> Result<Vec<String>, GeminiError>;
}

/// Lightweight HTTP client for Gemini operations.
pub struct GeminiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) model: String,
}

impl GeminiClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, GeminiError> {
        let config = get_config();
        let client = Client::builder().user_agent("docugem/0.1").build()?;

        let base_url =
            normalize_base_url(&config.gemini_base_url).map_err(GeminiError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            model = %config.gemini_model,
            "Initialized Gemini HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    /// Issue a single non-streaming generation call and return the candidate text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::UnexpectedStatus { status, body });
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
            })
            .ok_or_else(|| {
                GeminiError::MalformedResponse("response contained no candidate text".to_string())
            })
    }
}

#[async_trait]
impl PromptGateway for GeminiClient {
    async fn ask(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(error = %error, "Gemini request failed");
                GATEWAY_FALLBACK.to_string()
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GeminiError> {
        let url = format!("{}/v1beta/models", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::UnexpectedStatus { status, body });
        }

        let payload: ListModelsResponse = response.json().await?;
        Ok(payload.models.into_iter().map(|model| model.name).collect())
    }
}

/// Response body of the `generateContent` endpoint, reduced to the fields the
/// gateway consumes.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Response body of the model-listing endpoint.
#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}
