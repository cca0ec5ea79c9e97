use candle_core::{Device, IndexOp, Module, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear};
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaForMaskedLM, XLMRobertaModel};
use tokenizers::{Encoding, Tokenizer};

use crate::error::Result;
use crate::loaders::{LabelMap, TokenizerLoader, WeightsLoader};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::fill_mask::model::FillMaskModel;
use crate::pipelines::token_classification::model::TokenClassificationModel;

/// A RoBERTa checkpoint on the HuggingFace Hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobertaOptions {
    /// Hub repo id, e.g. `projecte-aina/roberta-base-ca-v2-cased-ner`.
    pub repo: String,
}

impl RobertaOptions {
    /// Options for the given hub repo.
    pub fn new(repo: impl Into<String>) -> Self {
        Self { repo: repo.into() }
    }
}

impl std::fmt::Display for RobertaOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repo)
    }
}

impl ModelOptions for RobertaOptions {
    fn cache_key(&self) -> String {
        self.repo.clone()
    }
}

fn load_tokenizer(options: &RobertaOptions) -> Result<Tokenizer> {
    TokenizerLoader::new(&options.repo, "tokenizer.json").load()
}

fn encoding_tensors(encoding: &Encoding, device: &Device) -> Result<(Tensor, Tensor, Tensor)> {
    let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;
    // RoBERTa has a single segment.
    let token_type_ids = input_ids.zeros_like()?;
    Ok((input_ids, attention_mask, token_type_ids))
}

/// RoBERTa with its masked language modeling head.
pub struct FillMaskRobertaModel {
    model: XLMRobertaForMaskedLM,
    device: Device,
}

impl FillMaskModel for FillMaskRobertaModel {
    type Options = RobertaOptions;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        let weights = WeightsLoader::new(&options.repo).load(&device)?;
        let config: Config = serde_json::from_str(&weights.config_json)?;
        let model = XLMRobertaForMaskedLM::new(&config, weights.vb)?;

        Ok(Self { model, device })
    }

    fn mask_probabilities(&self, encoding: &Encoding, mask_index: usize) -> Result<Vec<f32>> {
        let (input_ids, attention_mask, token_type_ids) =
            encoding_tensors(encoding, &self.device)?;

        let logits = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let logits = logits.squeeze(0)?.i((mask_index, ..))?;
        let probs = softmax(&logits, D::Minus1)?;

        Ok(probs.to_vec1::<f32>()?)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        load_tokenizer(&options)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

/// RoBERTa encoder with a per-token linear head (`RobertaForTokenClassification`).
pub struct TokenClassificationRobertaModel {
    roberta: XLMRobertaModel,
    classifier: Linear,
    labels: LabelMap,
    device: Device,
}

impl TokenClassificationModel for TokenClassificationRobertaModel {
    type Options = RobertaOptions;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        let weights = WeightsLoader::new(&options.repo).load(&device)?;
        let config: Config = serde_json::from_str(&weights.config_json)?;
        let labels = LabelMap::from_config_json(&weights.config_json)?;

        let roberta = XLMRobertaModel::new(&config, weights.vb.pp("roberta"))?;
        let classifier = linear(config.hidden_size, labels.len(), weights.vb.pp("classifier"))?;

        log::debug!("'{}' predicts {} labels", options.repo, labels.len());

        Ok(Self {
            roberta,
            classifier,
            labels,
            device,
        })
    }

    fn token_probabilities(&self, encoding: &Encoding) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask, token_type_ids) =
            encoding_tensors(encoding, &self.device)?;

        let hidden = self.roberta.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let logits = self.classifier.forward(&hidden)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?;

        Ok(probs.to_vec2::<f32>()?)
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        load_tokenizer(&options)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
