use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TranscriptionClient, TranscriptionError};
use crate::domain::{JobSnapshot, JobStatus, TranscriptionJobId, UploadUrl};
use crate::infrastructure::storage::ChunkedFileReader;

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

pub struct AssemblyAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    chunk_size: usize,
}

impl AssemblyAiClient {
    pub fn new(api_key: String, base_url: Option<String>, chunk_size: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chunk_size,
        }
    }

    fn transcript_endpoint(&self) -> String {
        format!("{}/transcript", self.base_url)
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: Option<String>,
}

#[derive(Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
}

#[derive(Deserialize)]
struct TranscriptResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptStatusResponse {
    status: JobStatus,
    text: Option<String>,
    error: Option<String>,
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    format!("status {}: {}", status, body)
}

#[async_trait]
impl TranscriptionClient for AssemblyAiClient {
    async fn upload(&self, path: &Path) -> Result<UploadUrl, TranscriptionError> {
        let url = format!("{}/upload", self.base_url);
        let reader = ChunkedFileReader::open(path, self.chunk_size).await?;

        tracing::debug!(
            path = %path.display(),
            chunk_size = self.chunk_size,
            "Streaming audio to transcription service"
        );

        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::Body::wrap_stream(reader.into_stream()))
            .send()
            .await
            .map_err(|e| TranscriptionError::UploadFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranscriptionError::UploadFailed(error_body(response).await));
        }

        let result: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::UploadFailed(format!("parse response: {}", e)))?;

        result.upload_url.map(UploadUrl::new).ok_or_else(|| {
            TranscriptionError::UploadFailed("response missing upload_url".to_string())
        })
    }

    async fn request_transcription(
        &self,
        upload_url: &UploadUrl,
    ) -> Result<TranscriptionJobId, TranscriptionError> {
        let response = self
            .client
            .post(self.transcript_endpoint())
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest {
                audio_url: upload_url.as_str(),
            })
            .send()
            .await
            .map_err(|e| TranscriptionError::SubmissionFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranscriptionError::SubmissionFailed(
                error_body(response).await,
            ));
        }

        let result: TranscriptResponse = response.json().await.map_err(|e| {
            TranscriptionError::SubmissionFailed(format!("parse response: {}", e))
        })?;

        result
            .id
            .map(TranscriptionJobId::new)
            .ok_or_else(|| TranscriptionError::SubmissionFailed("response missing id".to_string()))
    }

    async fn fetch_status(
        &self,
        job_id: &TranscriptionJobId,
    ) -> Result<JobSnapshot, TranscriptionError> {
        let url = format!("{}/{}", self.transcript_endpoint(), job_id);

        let response = self
            .client
            .get(&url)
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::PollFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranscriptionError::PollFailed(error_body(response).await));
        }

        let result: TranscriptStatusResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::PollFailed(format!("parse response: {}", e)))?;

        Ok(JobSnapshot {
            status: result.status,
            text: result.text,
            error: result.error,
        })
    }
}
