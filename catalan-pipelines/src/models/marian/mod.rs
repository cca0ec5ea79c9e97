use std::sync::Mutex;

use candle_core::{Device, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::models::marian::{Config, MTModel};
use serde_json::Value;

use crate::error::{PipelineError, Result};
use crate::loaders::WeightsLoader;
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::translation::model::TranslationModel;
use crate::pipelines::translation::LanguagePair;

mod tokenizer;

pub use tokenizer::MarianTokenizer;

/// A Marian (OPUS-MT) checkpoint.
///
/// Text is tokenized with the repo's `source.spm`, `target.spm` and `vocab.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarianOptions {
    /// Translation direction.
    pub pair: LanguagePair,
    /// Hub repo holding `config.json` and the weights.
    pub repo: String,
    /// Hub repo holding the SentencePiece models and vocabulary. Defaults to `repo`.
    pub tokenizer_repo: Option<String>,
}

impl MarianOptions {
    pub(crate) fn tokenizer_repo(&self) -> &str {
        self.tokenizer_repo.as_deref().unwrap_or(&self.repo)
    }
}

impl ModelOptions for MarianOptions {
    fn cache_key(&self) -> String {
        self.repo.clone()
    }
}

/// Marian encoder-decoder with greedy decoding.
pub struct MarianTranslationModel {
    // Decoding mutates the kv cache.
    model: Mutex<MTModel>,
    config: Config,
    device: Device,
}

impl TranslationModel for MarianTranslationModel {
    type Options = MarianOptions;
    type Tokenizer = MarianTokenizer;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        let weights = WeightsLoader::new(&options.repo).load(&device)?;
        let config = parse_config(&weights.config_json)?;
        let model = MTModel::new(&config, weights.vb)?;

        Ok(Self {
            model: Mutex::new(model),
            config,
            device,
        })
    }

    fn generate(&self, source_ids: &[u32], max_len: usize) -> Result<Vec<u32>> {
        let eos = self.config.eos_token_id;
        let forced_eos = self.config.forced_eos_token_id;

        let mut model = self
            .model
            .lock()
            .map_err(|_| PipelineError::Unexpected("Translation model lock poisoned".into()))?;
        model.reset_kv_cache();

        let mut source = source_ids.to_vec();
        if source.last() != Some(&eos) {
            source.push(eos);
        }
        let source = Tensor::new(source.as_slice(), &self.device)?.unsqueeze(0)?;
        let encoder_xs = model.encoder().forward(&source, 0)?;

        let mut logits_processor = LogitsProcessor::from_sampling(0, Sampling::ArgMax);
        let mut token_ids = vec![self.config.decoder_start_token_id];

        for index in 0..max_len {
            let context_size = if index >= 1 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = model.decode(&input_ids, &encoder_xs, start_pos)?;
            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;

            let token = logits_processor.sample(&logits)?;
            if token == eos || token == forced_eos {
                break;
            }
            token_ids.push(token);
        }

        if token_ids.len() > max_len {
            log::warn!("translation hit the {max_len} token limit");
        }

        Ok(token_ids.split_off(1))
    }

    fn get_tokenizer(options: Self::Options) -> Result<MarianTokenizer> {
        MarianTokenizer::load(options.tokenizer_repo())
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

/// Parse `config.json`, filling fields older OPUS-MT exports leave out.
fn parse_config(json: &str) -> Result<Config> {
    let mut value: Value = serde_json::from_str(json)?;
    let Some(fields) = value.as_object_mut() else {
        return Err(PipelineError::ModelConfig(
            "Marian config.json is not an object".into(),
        ));
    };

    if !fields.contains_key("forced_eos_token_id") {
        let eos = fields.get("eos_token_id").cloned().ok_or_else(|| {
            PipelineError::ModelConfig("Marian config.json has no eos_token_id".into())
        })?;
        fields.insert("forced_eos_token_id".into(), eos);
    }
    fields
        .entry("share_encoder_decoder_embeddings")
        .or_insert(Value::Bool(true));

    Ok(serde_json::from_value(value)?)
}
