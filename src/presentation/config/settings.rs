use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::{
    DEFAULT_LANGUAGE, LanguageCode, LanguageModelEntry, LanguageModels, PollPolicy,
};
use crate::infrastructure::storage::DEFAULT_CHUNK_SIZE;
use crate::infrastructure::transcription::DEFAULT_BASE_URL;

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub translation: TranslationSettings,
    pub uploads: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: Option<u32>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: 30,
            max_poll_attempts: None,
        }
    }
}

impl TranscriptionSettings {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_secs(self.poll_interval_secs),
            self.max_poll_attempts,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    pub default_language: String,
    pub models: BTreeMap<String, String>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        let models = LanguageModels::default()
            .entries()
            .map(|entry| (entry.code.to_string(), entry.location.clone()))
            .collect();

        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            models,
        }
    }
}

impl TranslationSettings {
    pub fn language_models(&self) -> LanguageModels {
        LanguageModels::new(self.models.iter().map(|(code, location)| LanguageModelEntry {
            code: LanguageCode::new(code.as_str()),
            location: location.clone(),
        }))
    }

    pub fn default_language(&self) -> LanguageCode {
        LanguageCode::new(self.default_language.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub chunk_size_bytes: usize,
    pub max_file_size_mb: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            chunk_size_bytes: DEFAULT_CHUNK_SIZE,
            max_file_size_mb: 100,
        }
    }
}

impl UploadSettings {
    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,transcript_translator=debug,tower_http=debug".to_string(),
            json_format: false,
        }
    }
}

impl Settings {
    /// Layers `appsettings.<environment>.toml` (optional) under `APP_`
    /// prefixed environment variables, e.g. `APP_TRANSCRIPTION__API_KEY`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
