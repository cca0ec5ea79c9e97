use std::sync::Arc;

use super::model::{TranslationModel, TranslationTokenizer};
use crate::error::{PipelineError, Result};
use crate::pipelines::stats::PipelineStats;

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Translated text.
    pub translation: String,
    /// Execution statistics.
    pub stats: PipelineStats,
}

/// Translates text between the languages of its model.
///
/// Construct with [`TranslationPipelineBuilder`](super::TranslationPipelineBuilder).
pub struct TranslationPipeline<M: TranslationModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: M::Tokenizer,
    pub(crate) max_len: usize,
}

impl<M: TranslationModel> TranslationPipeline<M> {
    /// Translate `text`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use catalan_pipelines::translation::{LanguagePair, TranslationPipelineBuilder};
    /// # fn main() -> catalan_pipelines::error::Result<()> {
    /// let pipeline = TranslationPipelineBuilder::opus_mt(LanguagePair::default()).build()?;
    /// let output = pipeline.run("Bienvenue en Catalogne !")?;
    /// println!("{}", output.translation);
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        if text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("Please enter some text".into()));
        }

        let source_ids = self.tokenizer.encode(text)?;
        let generated = self.model.generate(&source_ids, self.max_len)?;
        log::debug!(
            "translated {} source tokens into {} target tokens",
            source_ids.len(),
            generated.len()
        );

        let translation = self.tokenizer.decode(&generated)?.trim().to_string();

        Ok(Output {
            translation,
            stats: stats_builder.finish(1),
        })
    }

    /// Maximum number of tokens generated per translation.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}
