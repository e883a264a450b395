use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};

use crate::application::ports::TranslationError;

const CONFIG_FILE: &str = "config.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";
const TOKENIZER_FILE: &str = "tokenizer.json";
const TARGET_TOKENIZER_FILE: &str = "tokenizer-target.json";
const SENTENCEPIECE_SOURCE_FILE: &str = "source.spm";

/// Weight file of a model artifact. Older checkpoints only ship the
/// PyTorch pickle format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelWeights {
    Safetensors(PathBuf),
    Pytorch(PathBuf),
}

impl ModelWeights {
    pub fn path(&self) -> &Path {
        match self {
            ModelWeights::Safetensors(path) | ModelWeights::Pytorch(path) => path,
        }
    }
}

/// Files making up one translation model artifact.
///
/// Tokenizers must be in the `tokenizers` JSON format. A stock MarianMT
/// checkpoint ships SentencePiece `source.spm`/`target.spm` instead; those
/// are converted once into `tokenizer.json` (source side) and
/// `tokenizer-target.json` (target side) placed next to the weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub weights: ModelWeights,
    pub tokenizer: PathBuf,
    pub target_tokenizer: Option<PathBuf>,
}

impl ModelFiles {
    /// Resolves `location` as a local model directory, falling back to a
    /// model hub repository id when no such directory exists.
    pub fn resolve(location: &str) -> Result<Self, TranslationError> {
        let dir = Path::new(location);
        if dir.is_dir() {
            Self::from_dir(dir)
        } else {
            tracing::info!(repo = location, "Model directory not found, fetching from hub");
            Self::from_hub(location)
        }
    }

    pub fn from_dir(dir: &Path) -> Result<Self, TranslationError> {
        let existing = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };

        let config = existing(CONFIG_FILE).ok_or_else(|| {
            TranslationError::ModelLoadFailed(format!(
                "{} not found",
                dir.join(CONFIG_FILE).display()
            ))
        })?;

        let weights = match (existing(SAFETENSORS_FILE), existing(PYTORCH_FILE)) {
            (Some(path), _) => ModelWeights::Safetensors(path),
            (None, Some(path)) => ModelWeights::Pytorch(path),
            (None, None) => {
                return Err(TranslationError::ModelLoadFailed(format!(
                    "no {} or {} in {}",
                    SAFETENSORS_FILE,
                    PYTORCH_FILE,
                    dir.display()
                )));
            }
        };

        let tokenizer = existing(TOKENIZER_FILE).ok_or_else(|| {
            missing_tokenizer(
                &dir.display().to_string(),
                existing(SENTENCEPIECE_SOURCE_FILE).is_some(),
            )
        })?;

        Ok(Self {
            config,
            weights,
            tokenizer,
            target_tokenizer: existing(TARGET_TOKENIZER_FILE),
        })
    }

    fn from_hub(model_id: &str) -> Result<Self, TranslationError> {
        let api = Api::new().map_err(|e| TranslationError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config = fetch(&repo, CONFIG_FILE)?;

        let weights = match repo.get(SAFETENSORS_FILE) {
            Ok(path) => ModelWeights::Safetensors(path),
            Err(_) => ModelWeights::Pytorch(fetch(&repo, PYTORCH_FILE)?),
        };

        let tokenizer = repo.get(TOKENIZER_FILE).map_err(|_| {
            missing_tokenizer(model_id, repo.get(SENTENCEPIECE_SOURCE_FILE).is_ok())
        })?;

        Ok(Self {
            config,
            weights,
            tokenizer,
            target_tokenizer: repo.get(TARGET_TOKENIZER_FILE).ok(),
        })
    }
}

fn fetch(repo: &ApiRepo, name: &str) -> Result<PathBuf, TranslationError> {
    repo.get(name)
        .map_err(|e| TranslationError::ModelLoadFailed(format!("{name}: {e}")))
}

fn missing_tokenizer(location: &str, has_sentencepiece: bool) -> TranslationError {
    if has_sentencepiece {
        TranslationError::ModelLoadFailed(format!(
            "{location} has {SENTENCEPIECE_SOURCE_FILE} but no {TOKENIZER_FILE}; \
             convert the SentencePiece models to {TOKENIZER_FILE} and {TARGET_TOKENIZER_FILE} first"
        ))
    } else {
        TranslationError::ModelLoadFailed(format!("{TOKENIZER_FILE} not found in {location}"))
    }
}
