//! HTTP implementations of the workflow's external actions
//!
//! Talks to the analysis backend over its observed REST boundary: multipart
//! upload, crosstab analysis submission, and chat completion. Response
//! decoding is split into pure helpers so the wire contract is testable
//! without a running server. Backend error bodies of the form
//! `{"error": <message>}` are surfaced verbatim as the action failure, which
//! is what the coordinators display.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use xt_core::UploadCandidate;
use xt_workflow::{AnalysisAction, ChatSendAction, UploadAction, UploadReceipt};

/// Errors from talking to the analysis backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend rejected the request with its own message
    #[error("{0}")]
    Api(String),

    /// The backend answered with something the contract does not cover
    #[error("Unexpected response from server (status {status})")]
    Unexpected { status: u16 },

    /// An upload candidate carried no on-disk path to read from
    #[error("File contents are not available for upload: {name}")]
    MissingContents { name: String },
}

/// Client for the analysis backend, implementing all three action seams
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl UploadAction for BackendClient {
    async fn upload(&self, files: &[UploadCandidate]) -> anyhow::Result<UploadReceipt> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let path = file.path.clone().ok_or_else(|| ClientError::MissingContents {
                name: file.name.clone(),
            })?;
            let bytes = tokio::fs::read(&path).await?;

            let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file.name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part("file", part);
        }

        debug!(count = files.len(), "posting multipart upload");
        let response = self
            .http
            .post(self.endpoint("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(decode_upload_response(status, &body)?)
    }
}

#[async_trait]
impl AnalysisAction for BackendClient {
    async fn run(&self, row_ids: &[String], column_ids: &[String]) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.endpoint("/api/analysis"))
            .json(&analysis_body(row_ids, column_ids))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(decode_empty_response(status, &body)?)
    }
}

#[async_trait]
impl ChatSendAction for BackendClient {
    async fn send(&self, content: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .post(self.endpoint("/api/chat"))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(decode_chat_response(status, &body)?)
    }
}

/// Request body for an analysis submission
fn analysis_body(row_ids: &[String], column_ids: &[String]) -> serde_json::Value {
    serde_json::json!({
        "rowVariables": row_ids,
        "columnVariables": column_ids,
    })
}

#[derive(Debug, Deserialize)]
struct UploadOkBody {
    #[serde(default)]
    success: bool,
    #[serde(rename = "fileId")]
    file_id: String,
    #[serde(rename = "fileName")]
    file_name: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct ChatReplyBody {
    reply: String,
}

/// Decode a `POST /api/upload` response per the observed contract:
/// 200 carries `{success, fileId, fileName, size}`, 400/500 carry
/// `{error: <message>}`.
fn decode_upload_response(status: u16, body: &str) -> Result<UploadReceipt, ClientError> {
    if status == 200 {
        let ok: UploadOkBody =
            serde_json::from_str(body).map_err(|_| ClientError::Unexpected { status })?;
        if !ok.success {
            return Err(ClientError::Unexpected { status });
        }
        return Ok(UploadReceipt {
            file_id: ok.file_id,
            file_name: ok.file_name,
            size_bytes: ok.size,
        });
    }

    Err(decode_error_body(status, body))
}

fn decode_empty_response(status: u16, body: &str) -> Result<(), ClientError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(decode_error_body(status, body))
}

fn decode_chat_response(status: u16, body: &str) -> Result<String, ClientError> {
    if status == 200 {
        let reply: ChatReplyBody =
            serde_json::from_str(body).map_err(|_| ClientError::Unexpected { status })?;
        return Ok(reply.reply);
    }
    Err(decode_error_body(status, body))
}

fn decode_error_body(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => ClientError::Api(err.error),
        Err(_) => ClientError::Unexpected { status },
    }
}
