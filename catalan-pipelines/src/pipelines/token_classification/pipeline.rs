use std::sync::Arc;

use super::aggregation::{aggregate, clean_word, AggregationStrategy, TokenPrediction};
use super::model::TokenClassificationModel;
use crate::error::{preview, PipelineError, Result};
use crate::loaders::LabelMap;
use crate::pipelines::stats::PipelineStats;
use tokenizers::Tokenizer;

// ============ Output types ============

/// A labelled span of the input text.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity type or part-of-speech tag (`PER`, `NOUN`, ...).
    pub label: String,
    /// Mean confidence of the tokens in the span (0.0 to 1.0).
    pub score: f32,
    /// Span text with subword markers removed.
    pub word: String,
    /// Character offset of the span start.
    pub start: usize,
    /// Character offset one past the span end.
    pub end: usize,
}

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Labelled spans in input order.
    pub entities: Vec<Entity>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Pipeline ============

/// Labels the tokens of a text and aggregates them into spans.
///
/// Construct with [`TokenClassificationPipelineBuilder`](super::TokenClassificationPipelineBuilder).
pub struct TokenClassificationPipeline<M: TokenClassificationModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) aggregation: AggregationStrategy,
}

impl<M: TokenClassificationModel> TokenClassificationPipeline<M> {
    /// Label `text`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use catalan_pipelines::token_classification::TokenClassificationPipelineBuilder;
    /// # fn main() -> catalan_pipelines::error::Result<()> {
    /// let pipeline = TokenClassificationPipelineBuilder::catalan_pos().build()?;
    /// let output = pipeline.run("El gat negre dorm.")?;
    /// for tag in &output.entities {
    ///     println!("{:15} → {}", tag.word, tag.label);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        if text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("Please enter some text".into()));
        }

        let encoding = self.tokenizer.encode_char_offsets(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                preview(text),
                e
            ))
        })?;

        let probs = self.model.token_probabilities(&encoding)?;
        let tokens = token_predictions(
            encoding.get_ids(),
            encoding.get_offsets(),
            encoding.get_special_tokens_mask(),
            &probs,
            self.model.labels(),
        )?;

        let entities = aggregate(tokens, self.aggregation)
            .into_iter()
            .map(|span| {
                let word = self
                    .tokenizer
                    .decode(&span.token_ids, true)
                    .map_err(|e| {
                        PipelineError::Tokenization(format!("Failed to decode tokens: {e}"))
                    })?;
                Ok(Entity {
                    label: span.label,
                    score: span.score,
                    word: clean_word(&word),
                    start: span.start,
                    end: span.end,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Output {
            entities,
            stats: stats_builder.finish(1),
        })
    }

    /// Labels the model can predict, indexed by class id.
    pub fn labels(&self) -> &LabelMap {
        self.model.labels()
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

/// Best label per token, special tokens skipped.
pub(crate) fn token_predictions(
    ids: &[u32],
    offsets: &[(usize, usize)],
    special_tokens_mask: &[u32],
    probs: &[Vec<f32>],
    labels: &LabelMap,
) -> Result<Vec<TokenPrediction>> {
    if probs.len() != ids.len() {
        return Err(PipelineError::Unexpected(format!(
            "Model returned {} rows for {} tokens",
            probs.len(),
            ids.len()
        )));
    }

    let mut tokens = Vec::with_capacity(ids.len());
    for (i, row) in probs.iter().enumerate() {
        if special_tokens_mask.get(i).copied().unwrap_or(0) == 1 {
            continue;
        }

        let (label_id, score) = row
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| PipelineError::Unexpected("Model returned no label scores".into()))?;
        let label = labels.get(label_id).ok_or_else(|| {
            PipelineError::Unexpected(format!(
                "Predicted label id {label_id} outside {} known labels",
                labels.len()
            ))
        })?;
        let (start, end) = offsets.get(i).copied().unwrap_or((0, 0));

        tokens.push(TokenPrediction {
            token_id: ids[i],
            label: label.to_string(),
            score,
            start,
            end,
        });
    }

    Ok(tokens)
}
