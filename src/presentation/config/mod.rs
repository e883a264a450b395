mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    LoggingSettings, ServerSettings, Settings, TranscriptionSettings, TranslationSettings,
    UploadSettings,
};
