mod marian_translator;
mod model_files;

pub use marian_translator::{MarianModelLoader, MarianTranslator};
pub use model_files::{ModelFiles, ModelWeights};
