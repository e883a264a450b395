use std::sync::Arc;

use crate::application::services::SpeechTranslationService;
use crate::domain::LanguageCode;
use crate::infrastructure::storage::LocalUploadStore;

#[derive(Clone)]
pub struct AppState {
    pub speech_service: Arc<SpeechTranslationService>,
    pub upload_store: Arc<LocalUploadStore>,
    pub default_language: LanguageCode,
    pub max_upload_bytes: usize,
}
