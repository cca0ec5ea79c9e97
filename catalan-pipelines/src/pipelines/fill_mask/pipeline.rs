use std::sync::Arc;

use super::model::FillMaskModel;
use crate::error::{preview, PipelineError, Result};
use crate::pipelines::stats::PipelineStats;
use tokenizers::Tokenizer;

/// Mask tokens tried in order when reading a tokenizer's vocabulary.
const MASK_TOKENS: [&str; 2] = ["<mask>", "[MASK]"];

// ============ Output types ============

/// A predicted token with confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted word/token, without surrounding whitespace.
    pub token: String,
    /// Vocabulary id of the predicted token.
    pub token_id: u32,
    /// Confidence score (0.0 to 1.0).
    pub score: f32,
    /// Input sentence with the mask replaced by the prediction.
    pub sequence: String,
}

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Most likely prediction.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

/// Output from `run_top_k()`.
#[derive(Debug)]
pub struct TopKOutput {
    /// Predictions, best first.
    pub predictions: Vec<Prediction>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Pipeline ============

/// Predicts tokens for the mask placeholder in text.
///
/// Construct with [`FillMaskPipelineBuilder`](super::FillMaskPipelineBuilder).
///
/// # Examples
///
/// ```rust,no_run
/// # use catalan_pipelines::fill_mask::FillMaskPipelineBuilder;
/// # fn main() -> catalan_pipelines::error::Result<()> {
/// let pipeline = FillMaskPipelineBuilder::catalan().build()?;
///
/// let output = pipeline.run("El meu <mask> favorit és el blau.")?;
/// println!("{}: {:.2}", output.prediction.token, output.prediction.score);
/// # Ok(())
/// # }
/// ```
pub struct FillMaskPipeline<M: FillMaskModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) mask_token: String,
}

impl<M: FillMaskModel> FillMaskPipeline<M> {
    /// Predict the most likely token for the mask.
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        let prediction = self.predict(text, 1)?.pop().ok_or_else(|| {
            PipelineError::Unexpected("Model returned no predictions".to_string())
        })?;

        Ok(Output {
            prediction,
            stats: stats_builder.finish(1),
        })
    }

    /// Predict the top `k` tokens for the mask, best first.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use catalan_pipelines::fill_mask::FillMaskPipelineBuilder;
    /// # fn main() -> catalan_pipelines::error::Result<()> {
    /// # let pipeline = FillMaskPipelineBuilder::catalan().build()?;
    /// let output = pipeline.run_top_k("El gat <mask> a la catifa.", 5)?;
    /// for pred in &output.predictions {
    ///     println!("{}: {:.2}", pred.token, pred.score);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn run_top_k(&self, text: &str, k: usize) -> Result<TopKOutput> {
        let stats_builder = PipelineStats::start();
        let predictions = self.predict(text, k)?;

        Ok(TopKOutput {
            predictions,
            stats: stats_builder.finish(1),
        })
    }

    /// The placeholder this pipeline fills, e.g. `<mask>`.
    pub fn mask_token(&self) -> &str {
        &self.mask_token
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }

    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        check_single_mask(text, &self.mask_token)?;
        if k == 0 {
            return Ok(vec![]);
        }

        let encoding = self.tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                preview(text),
                e
            ))
        })?;

        let mask_id = self.tokenizer.token_to_id(&self.mask_token).ok_or_else(|| {
            PipelineError::Unexpected(format!("'{}' missing from vocabulary", self.mask_token))
        })?;
        let mask_index = encoding
            .get_ids()
            .iter()
            .position(|&id| id == mask_id)
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "Please include {} token in your text",
                    self.mask_token
                ))
            })?;

        let probs = self.model.mask_probabilities(&encoding, mask_index)?;

        let mut predictions = Vec::with_capacity(k);
        for idx in ranked_indices(&probs) {
            if predictions.len() == k {
                break;
            }
            let token_id = idx as u32;
            let token = self.decode(&[token_id])?;
            if token.is_empty() {
                continue;
            }

            let mut filled = encoding.get_ids().to_vec();
            filled[mask_index] = token_id;

            predictions.push(Prediction {
                token,
                token_id,
                score: probs[idx],
                sequence: self.decode(&filled)?,
            });
        }

        Ok(predictions)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map(|s| s.trim().to_string())
            .map_err(|e| PipelineError::Tokenization(format!("Failed to decode tokens: {e}")))
    }
}

/// Find which mask placeholder a tokenizer understands.
pub(crate) fn mask_token_of(tokenizer: &Tokenizer) -> Result<String> {
    MASK_TOKENS
        .iter()
        .find(|token| tokenizer.token_to_id(token).is_some())
        .map(|token| token.to_string())
        .ok_or_else(|| {
            PipelineError::ModelConfig(format!(
                "Tokenizer has no mask token (tried {})",
                MASK_TOKENS.join(", ")
            ))
        })
}

/// Fill-mask input must contain the mask placeholder exactly once.
pub(crate) fn check_single_mask(text: &str, mask_token: &str) -> Result<()> {
    match text.matches(mask_token).count() {
        0 => Err(PipelineError::InvalidInput(format!(
            "Please include {mask_token} token in your text"
        ))),
        1 => Ok(()),
        n => Err(PipelineError::InvalidInput(format!(
            "Found {n} {mask_token} tokens; include exactly one"
        ))),
    }
}

/// Indices of `probs`, most likely first.
pub(crate) fn ranked_indices(probs: &[f32]) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..probs.len()).collect();
    idxs.sort_by(|&i, &j| probs[j].total_cmp(&probs[i]));
    idxs
}
