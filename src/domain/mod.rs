mod job_status;
mod language_code;
mod language_model_entry;
mod poll_outcome;
mod storage_path;
mod transcription_job;
mod translation_outcome;
mod upload_id;
mod uploaded_audio;

pub use job_status::JobStatus;
pub use language_code::{DEFAULT_LANGUAGE, LanguageCode};
pub use language_model_entry::{LanguageModelEntry, LanguageModels};
pub use poll_outcome::{DEFAULT_POLL_INTERVAL, PollOutcome, PollPolicy};
pub use storage_path::{StoragePath, sanitize_filename};
pub use transcription_job::{JobSnapshot, TranscriptionJobId, UploadUrl};
pub use translation_outcome::TranslationOutcome;
pub use upload_id::UploadId;
pub use uploaded_audio::UploadedAudio;
