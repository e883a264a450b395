use std::sync::Arc;

use crate::domain::LanguageModelEntry;

/// A loaded sequence-to-sequence model translating English text into one
/// target language. Calls block while the model runs.
pub trait TranslationModel: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Resolves a model artifact and loads it. Blocking.
pub trait ModelLoader: Send + Sync {
    fn load(
        &self,
        entry: &LanguageModelEntry,
    ) -> Result<Arc<dyn TranslationModel>, TranslationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("translation task aborted: {0}")]
    TaskFailed(String),
}
