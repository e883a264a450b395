use std::sync::Arc;

use crate::application::ports::{TranscriptionClient, TranscriptionError, TranslationError};
use crate::domain::{LanguageCode, PollOutcome, PollPolicy, TranslationOutcome, UploadedAudio};

use super::translation_service::TranslationService;

/// Transcribes an uploaded audio file and translates the transcript.
pub struct SpeechTranslationService {
    transcription_client: Arc<dyn TranscriptionClient>,
    translation_service: Arc<TranslationService>,
    poll_policy: PollPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTranslation {
    pub transcription: String,
    pub translation: TranslationOutcome,
}

impl SpeechTranslationService {
    pub fn new(
        transcription_client: Arc<dyn TranscriptionClient>,
        translation_service: Arc<TranslationService>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            transcription_client,
            translation_service,
            poll_policy,
        }
    }

    pub fn supported_languages(&self) -> Vec<String> {
        self.translation_service
            .languages()
            .codes()
            .map(|code| code.to_string())
            .collect()
    }

    pub async fn process(
        &self,
        audio: &UploadedAudio,
        language: &LanguageCode,
    ) -> Result<SpeechTranslation, SpeechTranslationError> {
        let transcription = self.transcribe(audio).await?;

        let translation = self
            .translation_service
            .translate(&transcription, language)
            .await?;

        Ok(SpeechTranslation {
            transcription,
            translation,
        })
    }

    /// Runs upload, job submission and polling. A job that the service
    /// reports as failed yields its error as the transcript text.
    pub async fn transcribe(
        &self,
        audio: &UploadedAudio,
    ) -> Result<String, SpeechTranslationError> {
        let upload_url = self.transcription_client.upload(&audio.path).await?;
        tracing::debug!(
            filename = %audio.original_filename,
            bytes = audio.size_bytes,
            "Audio uploaded to transcription service"
        );

        let job_id = self
            .transcription_client
            .request_transcription(&upload_url)
            .await?;
        tracing::info!(job_id = %job_id, "Transcription job submitted");

        let outcome = self
            .transcription_client
            .poll_until_done(&job_id, self.poll_policy)
            .await?;

        match outcome {
            PollOutcome::Completed(text) => {
                tracing::info!(job_id = %job_id, chars = text.len(), "Transcription completed");
                Ok(text)
            }
            PollOutcome::Failed(reason) => {
                tracing::warn!(job_id = %job_id, reason = %reason, "Transcription job failed");
                Ok(format!("Error: {}", reason))
            }
            PollOutcome::TimedOut { attempts } => {
                Err(SpeechTranslationError::TranscriptionTimedOut { attempts })
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechTranslationError {
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("transcription did not finish after {attempts} status checks")]
    TranscriptionTimedOut { attempts: u32 },
    #[error("translation: {0}")]
    Translation(#[from] TranslationError),
}
