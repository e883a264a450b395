use std::time::Duration;

use serde_json::json;

use transcript_translator::application::ports::{TranscriptionClient, TranscriptionError};
use transcript_translator::domain::{PollOutcome, PollPolicy, TranscriptionJobId, UploadUrl};
use transcript_translator::infrastructure::transcription::AssemblyAiClient;

use crate::helpers::{MockTranscriptionServer, TEST_API_KEY};

fn client_for(server: &MockTranscriptionServer, chunk_size: usize) -> AssemblyAiClient {
    AssemblyAiClient::new(
        TEST_API_KEY.to_string(),
        Some(server.base_url.clone()),
        chunk_size,
    )
}

fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(5), None)
}

#[tokio::test]
async fn given_audio_file_when_uploading_then_streams_all_bytes_with_authorization() {
    let server = MockTranscriptionServer::builder().start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("clip.wav");
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();
    std::fs::write(&path, &content).unwrap();

    let url = client_for(&server, 1024).upload(&path).await.unwrap();

    assert_eq!(url, UploadUrl::new("https://cdn.example.com/upload/abc"));
    assert_eq!(server.uploaded_bytes(), content);
    assert_eq!(server.authorization_headers(), vec![TEST_API_KEY]);
}

#[tokio::test]
async fn given_upload_response_without_url_when_uploading_then_returns_upload_failed() {
    let server = MockTranscriptionServer::builder()
        .upload_response(200, json!({"message": "ok"}))
        .start()
        .await;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, b"RIFF").unwrap();

    let result = client_for(&server, 1024).upload(&path).await;

    assert!(matches!(result, Err(TranscriptionError::UploadFailed(_))));
}

#[tokio::test]
async fn given_unauthorized_upload_when_uploading_then_returns_upload_failed_with_status() {
    let server = MockTranscriptionServer::builder()
        .upload_response(401, json!({"error": "Authentication error"}))
        .start()
        .await;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, b"RIFF").unwrap();

    let result = client_for(&server, 1024).upload(&path).await;

    match result {
        Err(TranscriptionError::UploadFailed(message)) => assert!(message.contains("401")),
        other => panic!("expected upload failure, got {:?}", other),
    }
}

#[tokio::test]
async fn given_missing_file_when_uploading_then_returns_io_error() {
    let server = MockTranscriptionServer::builder().start().await;
    let dir = tempfile::TempDir::new().unwrap();

    let result = client_for(&server, 1024)
        .upload(&dir.path().join("missing.wav"))
        .await;

    assert!(matches!(result, Err(TranscriptionError::Io(_))));
    assert!(server.uploaded_bytes().is_empty());
}

#[tokio::test]
async fn given_upload_url_when_requesting_transcription_then_returns_job_id() {
    let server = MockTranscriptionServer::builder().start().await;

    let job_id = client_for(&server, 1024)
        .request_transcription(&UploadUrl::new("https://cdn.example.com/upload/abc"))
        .await
        .unwrap();

    assert_eq!(job_id, TranscriptionJobId::new("job-123"));
    assert_eq!(
        server.audio_urls(),
        vec!["https://cdn.example.com/upload/abc"]
    );
    assert_eq!(server.authorization_headers(), vec![TEST_API_KEY]);
}

#[tokio::test]
async fn given_submission_response_without_id_when_requesting_then_returns_submission_failed() {
    let server = MockTranscriptionServer::builder()
        .transcript_response(200, json!({"status": "queued"}))
        .start()
        .await;

    let result = client_for(&server, 1024)
        .request_transcription(&UploadUrl::new("https://cdn.example.com/upload/abc"))
        .await;

    assert!(matches!(result, Err(TranscriptionError::SubmissionFailed(_))));
}

#[tokio::test]
async fn given_job_completing_after_retries_when_polling_then_returns_text() {
    let server = MockTranscriptionServer::builder()
        .poll_responses(vec![
            (200, json!({"id": "job-123", "status": "queued"})),
            (200, json!({"id": "job-123", "status": "processing"})),
            (
                200,
                json!({"id": "job-123", "status": "completed", "text": "Hello world"}),
            ),
        ])
        .start()
        .await;

    let outcome = client_for(&server, 1024)
        .poll_until_done(&TranscriptionJobId::new("job-123"), fast_policy())
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Completed("Hello world".to_string()));
    assert_eq!(server.polls(), 3);
    assert!(server.polled_ids().iter().all(|id| id == "job-123"));
}

#[tokio::test]
async fn given_job_error_status_when_polling_then_returns_failed_with_reason() {
    let server = MockTranscriptionServer::builder()
        .poll_responses(vec![(
            200,
            json!({"id": "job-123", "status": "error", "error": "File does not appear to contain audio"}),
        )])
        .start()
        .await;

    let outcome = client_for(&server, 1024)
        .poll_until_done(&TranscriptionJobId::new("job-123"), fast_policy())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PollOutcome::Failed("File does not appear to contain audio".to_string())
    );
    assert_eq!(server.polls(), 1);
}

#[tokio::test]
async fn given_server_error_mid_poll_when_polling_then_returns_poll_failed() {
    let server = MockTranscriptionServer::builder()
        .poll_responses(vec![
            (200, json!({"id": "job-123", "status": "processing"})),
            (503, json!({"error": "service unavailable"})),
        ])
        .start()
        .await;

    let result = client_for(&server, 1024)
        .poll_until_done(&TranscriptionJobId::new("job-123"), fast_policy())
        .await;

    assert!(matches!(result, Err(TranscriptionError::PollFailed(_))));
    assert_eq!(server.polls(), 2);
}

#[tokio::test]
async fn given_malformed_status_body_when_polling_then_returns_poll_failed() {
    let server = MockTranscriptionServer::builder()
        .poll_responses(vec![(200, json!({"id": "job-123"}))])
        .start()
        .await;

    let result = client_for(&server, 1024)
        .fetch_status(&TranscriptionJobId::new("job-123"))
        .await;

    assert!(matches!(result, Err(TranscriptionError::PollFailed(_))));
}

#[tokio::test]
async fn given_base_url_with_trailing_slash_when_requesting_then_endpoint_is_normalized() {
    let server = MockTranscriptionServer::builder().start().await;
    let client = AssemblyAiClient::new(
        TEST_API_KEY.to_string(),
        Some(format!("{}/", server.base_url)),
        1024,
    );

    let job_id = client
        .request_transcription(&UploadUrl::new("https://cdn.example.com/upload/abc"))
        .await
        .unwrap();

    assert_eq!(job_id.as_str(), "job-123");
}
