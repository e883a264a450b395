mod transcription_client;
mod translation_model;

pub use transcription_client::{TranscriptionClient, TranscriptionError};
pub use translation_model::{ModelLoader, TranslationError, TranslationModel};
