use std::sync::Arc;

use crate::application::ports::{ModelLoader, TranslationError};
use crate::domain::{LanguageCode, LanguageModels, TranslationOutcome};

use super::model_cache::ModelCache;

pub struct TranslationService {
    languages: LanguageModels,
    loader: Arc<dyn ModelLoader>,
    cache: ModelCache,
}

impl TranslationService {
    pub fn new(languages: LanguageModels, loader: Arc<dyn ModelLoader>) -> Self {
        let cache = ModelCache::new(&languages);
        Self {
            languages,
            loader,
            cache,
        }
    }

    pub fn languages(&self) -> &LanguageModels {
        &self.languages
    }

    pub fn is_model_loaded(&self, code: &LanguageCode) -> bool {
        self.cache.is_loaded(code)
    }

    /// Translates English `text` into `language`.
    ///
    /// A language without a configured model is not an error: the outcome
    /// is [`TranslationOutcome::UnsupportedLanguage`] and no model is loaded.
    pub async fn translate(
        &self,
        text: &str,
        language: &LanguageCode,
    ) -> Result<TranslationOutcome, TranslationError> {
        let Some(entry) = self.languages.get(language) else {
            tracing::warn!(language = %language, "Unsupported target language");
            return Ok(TranslationOutcome::UnsupportedLanguage(language.clone()));
        };

        let model = self.cache.get_or_load(entry, &self.loader).await?;

        tracing::debug!(
            language = %language,
            chars = text.len(),
            "Translating transcript"
        );

        let input = text.to_string();
        let translated = tokio::task::spawn_blocking(move || model.translate(&input))
            .await
            .map_err(|e| TranslationError::TaskFailed(format!("task join error: {e}")))??;

        tracing::info!(
            language = %language,
            chars = translated.len(),
            "Translation completed"
        );

        Ok(TranslationOutcome::Translated(translated))
    }
}
