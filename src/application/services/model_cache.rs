use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::ports::{ModelLoader, TranslationError, TranslationModel};
use crate::domain::{LanguageCode, LanguageModelEntry, LanguageModels};

/// Insert-once store of loaded translation models, one slot per configured
/// language. A slot is filled on first use and shared afterwards. A failed
/// load leaves the slot empty so the next request tries again.
pub struct ModelCache {
    slots: HashMap<LanguageCode, OnceCell<Arc<dyn TranslationModel>>>,
}

impl ModelCache {
    pub fn new(languages: &LanguageModels) -> Self {
        Self {
            slots: languages
                .codes()
                .map(|code| (code.clone(), OnceCell::new()))
                .collect(),
        }
    }

    pub fn is_loaded(&self, code: &LanguageCode) -> bool {
        self.slots
            .get(code)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    pub async fn get_or_load(
        &self,
        entry: &LanguageModelEntry,
        loader: &Arc<dyn ModelLoader>,
    ) -> Result<Arc<dyn TranslationModel>, TranslationError> {
        let slot = self.slots.get(&entry.code).ok_or_else(|| {
            TranslationError::ModelLoadFailed(format!("no model slot for '{}'", entry.code))
        })?;

        let model = slot
            .get_or_try_init(|| {
                let loader = Arc::clone(loader);
                let entry = entry.clone();
                async move {
                    tracing::info!(
                        language = %entry.code,
                        location = %entry.location,
                        "Loading translation model"
                    );
                    tokio::task::spawn_blocking(move || loader.load(&entry))
                        .await
                        .map_err(|e| TranslationError::TaskFailed(format!("task join error: {e}")))?
                }
            })
            .await?;

        Ok(Arc::clone(model))
    }
}
