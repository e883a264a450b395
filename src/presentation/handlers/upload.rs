use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::Serialize;

use crate::domain::LanguageCode;
use crate::infrastructure::observability::preview_text;
use crate::infrastructure::storage::{StagedUpload, UploadStoreError};
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";
const LANGUAGE_FIELD: &str = "language";

#[derive(Serialize)]
pub struct UploadResponse {
    pub transcription: String,
    pub translation: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut staged: Option<StagedUpload> = None;
    let mut language: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                // Without a filename attribute the part is a plain form value, not a file.
                let Some(filename) = field.file_name().map(str::to_string) else {
                    tracing::debug!("Ignoring file field without a filename");
                    continue;
                };
                if filename.is_empty() {
                    tracing::warn!("Upload request with empty filename");
                    return error_response(StatusCode::BAD_REQUEST, "No file selected");
                }

                match state.upload_store.store(&filename, field.boxed()).await {
                    Ok(upload) => {
                        tracing::debug!(
                            filename = %filename,
                            bytes = upload.audio().size_bytes,
                            "Audio file received"
                        );
                        staged = Some(upload);
                    }
                    Err(UploadStoreError::ReadFailed(e)) => {
                        tracing::error!(error = %e, "Failed to read uploaded file");
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file: {}", e),
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to store uploaded file");
                        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
                    }
                }
            }
            Some(LANGUAGE_FIELD) => match field.text().await {
                Ok(value) => language = Some(value),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read language: {}", e),
                    );
                }
            },
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    let Some(upload) = staged else {
        tracing::warn!("Upload request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let language = language
        .map(LanguageCode::new)
        .unwrap_or_else(|| state.default_language.clone());

    let result = state
        .speech_service
        .process(upload.audio(), &language)
        .await;

    drop(upload);

    match result {
        Ok(output) => {
            let translation = output.translation.to_string();
            tracing::info!(
                language = %language,
                transcription = %preview_text(&output.transcription),
                translation = %preview_text(&translation),
                "Upload processed"
            );
            (
                StatusCode::OK,
                Json(UploadResponse {
                    transcription: output.transcription,
                    translation,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, language = %language, "Upload processing failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
