use std::sync::{Arc, Mutex};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::marian::{Config, MTModel};
use tokenizers::Tokenizer;

use crate::application::ports::{ModelLoader, TranslationError, TranslationModel};
use crate::domain::LanguageModelEntry;

use super::model_files::{ModelFiles, ModelWeights};

const MAX_GENERATED_TOKENS: usize = 512;

/// MarianMT encoder-decoder running on candle with greedy decoding.
pub struct MarianTranslator {
    model: Mutex<MTModel>,
    source_tokenizer: Tokenizer,
    target_tokenizer: Tokenizer,
    config: Config,
    device: Device,
}

impl MarianTranslator {
    pub fn load(files: &ModelFiles) -> Result<Self, TranslationError> {
        let device = Device::Cpu;

        let config_contents = std::fs::read_to_string(&files.config)
            .map_err(|e| TranslationError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranslationError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let source_tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| TranslationError::ModelLoadFailed(format!("tokenizer: {}", e)))?;
        let target_tokenizer = match &files.target_tokenizer {
            Some(path) => Tokenizer::from_file(path).map_err(|e| {
                TranslationError::ModelLoadFailed(format!("target tokenizer: {}", e))
            })?,
            None => source_tokenizer.clone(),
        };

        let vb = match &files.weights {
            // SAFETY: safetensors files are memory-mapped read-only
            ModelWeights::Safetensors(path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)
            },
            ModelWeights::Pytorch(path) => VarBuilder::from_pth(path, DType::F32, &device),
        }
        .map_err(|e| TranslationError::ModelLoadFailed(format!("weights: {}", e)))?;

        let model = MTModel::new(&config, vb)
            .map_err(|e| TranslationError::ModelLoadFailed(format!("model: {}", e)))?;

        Ok(Self {
            model: Mutex::new(model),
            source_tokenizer,
            target_tokenizer,
            config,
            device,
        })
    }

    fn generate(&self, model: &mut MTModel, text: &str) -> Result<Vec<u32>, TranslationError> {
        let mut input_ids = self
            .source_tokenizer
            .encode(text, true)
            .map_err(|e| TranslationError::InferenceFailed(format!("tokenization: {}", e)))?
            .get_ids()
            .to_vec();
        input_ids.push(self.config.eos_token_id);

        let input = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(inference)?;
        let encoder_xs = model
            .encoder()
            .forward(&input, 0)
            .map_err(|e| TranslationError::InferenceFailed(format!("encoder: {}", e)))?;

        let mut tokens = vec![self.config.decoder_start_token_id];

        for index in 0..MAX_GENERATED_TOKENS {
            let context_size = if index >= 1 { 1 } else { tokens.len() };
            let start_pos = tokens.len().saturating_sub(context_size);

            let decoder_input = Tensor::new(&tokens[start_pos..], &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(inference)?;

            let logits = model
                .decode(&decoder_input, &encoder_xs, start_pos)
                .map_err(|e| TranslationError::InferenceFailed(format!("decoder: {}", e)))?;
            let logits = logits.squeeze(0).map_err(inference)?;
            let seq_len = logits.dim(0).map_err(inference)?;

            let next_token = logits
                .get(seq_len - 1)
                .and_then(|l| l.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(inference)?;

            if next_token == self.config.eos_token_id
                || next_token == self.config.forced_eos_token_id
            {
                break;
            }
            tokens.push(next_token);
        }

        Ok(tokens.split_off(1))
    }
}

fn inference(e: candle_core::Error) -> TranslationError {
    TranslationError::InferenceFailed(e.to_string())
}

impl TranslationModel for MarianTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| TranslationError::InferenceFailed("model lock poisoned".to_string()))?;

        let generated = self.generate(&mut model, text);
        model.reset_kv_cache();
        let tokens = generated?;

        let translated = self
            .target_tokenizer
            .decode(&tokens, true)
            .map_err(|e| TranslationError::InferenceFailed(format!("detokenization: {}", e)))?;

        Ok(translated.trim().to_string())
    }
}

/// Loads MarianMT artifacts from a model directory or hub repository.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarianModelLoader;

impl ModelLoader for MarianModelLoader {
    fn load(
        &self,
        entry: &LanguageModelEntry,
    ) -> Result<Arc<dyn TranslationModel>, TranslationError> {
        let files = ModelFiles::resolve(&entry.location)?;
        let translator = MarianTranslator::load(&files)?;

        tracing::info!(
            language = %entry.code,
            location = %entry.location,
            "Translation model loaded"
        );

        Ok(Arc::new(translator))
    }
}
