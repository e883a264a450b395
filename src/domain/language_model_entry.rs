use std::collections::BTreeMap;

use super::LanguageCode;

/// Where the pretrained model for one target language lives.
///
/// The location is either a local directory or a model hub repository id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageModelEntry {
    pub code: LanguageCode,
    pub location: String,
}

/// Immutable set of supported target languages, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageModels {
    entries: BTreeMap<LanguageCode, LanguageModelEntry>,
}

impl LanguageModels {
    pub fn new(entries: impl IntoIterator<Item = LanguageModelEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.code.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, code: &LanguageCode) -> Option<&LanguageModelEntry> {
        self.entries.get(code)
    }

    pub fn is_supported(&self, code: &LanguageCode) -> bool {
        self.entries.contains_key(code)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LanguageModelEntry> {
        self.entries.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &LanguageCode> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LanguageModels {
    fn default() -> Self {
        Self::new([
            LanguageModelEntry {
                code: LanguageCode::new("fr"),
                location: "./models/opus-mt-en-fr".to_string(),
            },
            LanguageModelEntry {
                code: LanguageCode::new("ja"),
                location: "./models/opus-mt-en-jap".to_string(),
            },
            LanguageModelEntry {
                code: LanguageCode::new("hi"),
                location: "./models/opus-mt-en-hi".to_string(),
            },
        ])
    }
}
