mod model_cache;
mod speech_translation_service;
mod translation_service;

pub use model_cache::ModelCache;
pub use speech_translation_service::{
    SpeechTranslation, SpeechTranslationError, SpeechTranslationService,
};
pub use translation_service::TranslationService;
