use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcript_translator::application::ports::{
    ModelLoader, TranscriptionClient, TranscriptionError, TranslationError, TranslationModel,
};
use transcript_translator::domain::{
    JobSnapshot, LanguageModelEntry, TranscriptionJobId, UploadUrl,
};

pub const TEST_API_KEY: &str = "test-key";

pub struct FixedTranslationModel {
    output: String,
}

impl TranslationModel for FixedTranslationModel {
    fn translate(&self, _text: &str) -> Result<String, TranslationError> {
        Ok(self.output.clone())
    }
}

/// Loader handing out a model that always returns `output`, counting loads.
pub struct CountingLoader {
    output: String,
    fail: bool,
    loads: AtomicUsize,
}

impl CountingLoader {
    pub fn returning(output: &str) -> Self {
        Self {
            output: output.to_string(),
            fail: false,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            output: String::new(),
            fail: true,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for CountingLoader {
    fn load(
        &self,
        entry: &LanguageModelEntry,
    ) -> Result<Arc<dyn TranslationModel>, TranslationError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranslationError::ModelLoadFailed(format!(
                "{} not found",
                entry.location
            )));
        }
        Ok(Arc::new(FixedTranslationModel {
            output: self.output.clone(),
        }))
    }
}

/// Transcription client replaying a fixed list of status snapshots.
pub struct ScriptedTranscriptionClient {
    snapshots: Mutex<VecDeque<JobSnapshot>>,
    upload_error: bool,
    fetches: AtomicUsize,
    uploaded_file_existed: Mutex<Option<bool>>,
}

impl ScriptedTranscriptionClient {
    pub fn new(snapshots: Vec<JobSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            upload_error: false,
            fetches: AtomicUsize::new(0),
            uploaded_file_existed: Mutex::new(None),
        }
    }

    pub fn failing_upload() -> Self {
        Self {
            upload_error: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn uploaded_file_existed(&self) -> Option<bool> {
        *self.uploaded_file_existed.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl TranscriptionClient for ScriptedTranscriptionClient {
    async fn upload(&self, path: &Path) -> Result<UploadUrl, TranscriptionError> {
        *self.uploaded_file_existed.lock().unwrap() = Some(path.is_file());
        if self.upload_error {
            return Err(TranscriptionError::UploadFailed(
                "response missing upload_url".to_string(),
            ));
        }
        Ok(UploadUrl::new("https://cdn.example.com/audio/1"))
    }

    async fn request_transcription(
        &self,
        _upload_url: &UploadUrl,
    ) -> Result<TranscriptionJobId, TranscriptionError> {
        Ok(TranscriptionJobId::new("job-1"))
    }

    async fn fetch_status(
        &self,
        _job_id: &TranscriptionJobId,
    ) -> Result<JobSnapshot, TranscriptionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TranscriptionError::PollFailed("connection reset".to_string()))
    }
}

struct MockServerState {
    upload_response: (u16, Value),
    transcript_response: (u16, Value),
    poll_responses: Vec<(u16, Value)>,
    polls: AtomicUsize,
    uploaded: Mutex<Vec<u8>>,
    authorization: Mutex<Vec<String>>,
    audio_urls: Mutex<Vec<String>>,
    polled_ids: Mutex<Vec<String>>,
}

/// In-process stand-in for the transcription REST API.
pub struct MockTranscriptionServer {
    pub base_url: String,
    state: Arc<MockServerState>,
    shutdown: Option<oneshot::Sender<()>>,
}

pub struct MockTranscriptionServerBuilder {
    upload_response: (u16, Value),
    transcript_response: (u16, Value),
    poll_responses: Vec<(u16, Value)>,
}

impl MockTranscriptionServerBuilder {
    pub fn upload_response(mut self, status: u16, body: Value) -> Self {
        self.upload_response = (status, body);
        self
    }

    pub fn transcript_response(mut self, status: u16, body: Value) -> Self {
        self.transcript_response = (status, body);
        self
    }

    /// Responses for successive status polls; the last one repeats.
    pub fn poll_responses(mut self, responses: Vec<(u16, Value)>) -> Self {
        self.poll_responses = responses;
        self
    }

    pub async fn start(self) -> MockTranscriptionServer {
        let state = Arc::new(MockServerState {
            upload_response: self.upload_response,
            transcript_response: self.transcript_response,
            poll_responses: self.poll_responses,
            polls: AtomicUsize::new(0),
            uploaded: Mutex::new(Vec::new()),
            authorization: Mutex::new(Vec::new()),
            audio_urls: Mutex::new(Vec::new()),
            polled_ids: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/upload", post(mock_upload))
            .route("/transcript", post(mock_transcript))
            .route("/transcript/{id}", get(mock_poll))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        MockTranscriptionServer {
            base_url: format!("http://{}", addr),
            state,
            shutdown: Some(shutdown_tx),
        }
    }
}

impl MockTranscriptionServer {
    pub fn builder() -> MockTranscriptionServerBuilder {
        MockTranscriptionServerBuilder {
            upload_response: (
                200,
                json!({"upload_url": "https://cdn.example.com/upload/abc"}),
            ),
            transcript_response: (200, json!({"id": "job-123", "status": "queued"})),
            poll_responses: vec![(
                200,
                json!({"id": "job-123", "status": "completed", "text": "Hello world"}),
            )],
        }
    }

    pub fn uploaded_bytes(&self) -> Vec<u8> {
        self.state.uploaded.lock().unwrap().clone()
    }

    pub fn authorization_headers(&self) -> Vec<String> {
        self.state.authorization.lock().unwrap().clone()
    }

    pub fn audio_urls(&self) -> Vec<String> {
        self.state.audio_urls.lock().unwrap().clone()
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.state.polled_ids.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.state.polls.load(Ordering::SeqCst)
    }
}

impl Drop for MockTranscriptionServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

fn record_authorization(state: &MockServerState, headers: &HeaderMap) {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorization.lock().unwrap().push(value.to_string());
    }
}

fn respond((status, body): &(u16, Value)) -> axum::response::Response {
    (
        StatusCode::from_u16(*status).unwrap(),
        axum::Json(body.clone()),
    )
        .into_response()
}

async fn mock_upload(
    State(state): State<Arc<MockServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    record_authorization(&state, &headers);
    state.uploaded.lock().unwrap().extend_from_slice(&body);
    respond(&state.upload_response)
}

async fn mock_transcript(
    State(state): State<Arc<MockServerState>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<Value>,
) -> axum::response::Response {
    record_authorization(&state, &headers);
    if let Some(url) = request.get("audio_url").and_then(Value::as_str) {
        state.audio_urls.lock().unwrap().push(url.to_string());
    }
    respond(&state.transcript_response)
}

async fn mock_poll(
    State(state): State<Arc<MockServerState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    record_authorization(&state, &headers);
    state.polled_ids.lock().unwrap().push(id);
    let index = state.polls.fetch_add(1, Ordering::SeqCst);
    let last = state.poll_responses.len().saturating_sub(1);
    respond(&state.poll_responses[index.min(last)])
}
