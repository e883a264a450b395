use std::fmt;

use super::LanguageCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    UnsupportedLanguage(LanguageCode),
}

impl TranslationOutcome {
    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated(_))
    }
}

impl fmt::Display for TranslationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationOutcome::Translated(text) => f.write_str(text),
            TranslationOutcome::UnsupportedLanguage(code) => {
                write!(f, "Error: Language '{}' is not supported.", code)
            }
        }
    }
}
