use std::path::Path;

use async_trait::async_trait;

use crate::domain::{
    JobSnapshot, JobStatus, PollOutcome, PollPolicy, TranscriptionJobId, UploadUrl,
};

#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Streams the file at `path` to the service and returns the URL it was
    /// stored under.
    async fn upload(&self, path: &Path) -> Result<UploadUrl, TranscriptionError>;

    async fn request_transcription(
        &self,
        upload_url: &UploadUrl,
    ) -> Result<TranscriptionJobId, TranscriptionError>;

    async fn fetch_status(
        &self,
        job_id: &TranscriptionJobId,
    ) -> Result<JobSnapshot, TranscriptionError>;

    /// Reads the job status until it is terminal or `policy` runs out of
    /// attempts. A failed read is returned immediately and not retried.
    async fn poll_until_done(
        &self,
        job_id: &TranscriptionJobId,
        policy: PollPolicy,
    ) -> Result<PollOutcome, TranscriptionError> {
        let mut attempts: u32 = 0;

        loop {
            let snapshot = self.fetch_status(job_id).await?;
            attempts += 1;

            match snapshot.status {
                JobStatus::Completed => {
                    return Ok(PollOutcome::Completed(snapshot.text.unwrap_or_default()));
                }
                JobStatus::Error => {
                    return Ok(PollOutcome::Failed(
                        snapshot
                            .error
                            .unwrap_or_else(|| "unknown error".to_string()),
                    ));
                }
                JobStatus::Queued | JobStatus::Processing | JobStatus::Unknown => {}
            }

            if !policy.should_retry(attempts) {
                tracing::warn!(
                    job_id = %job_id,
                    attempts,
                    "Transcription job did not finish within poll limit"
                );
                return Ok(PollOutcome::TimedOut { attempts });
            }

            tracing::debug!(
                job_id = %job_id,
                status = %snapshot.status,
                attempt = attempts,
                interval_ms = policy.interval.as_millis() as u64,
                "Transcription job not finished, waiting"
            );

            tokio::time::sleep(policy.interval).await;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("transcription request failed: {0}")]
    SubmissionFailed(String),
    #[error("status poll failed: {0}")]
    PollFailed(String),
    #[error("could not read audio file: {0}")]
    Io(#[from] std::io::Error),
}
