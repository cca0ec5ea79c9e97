use std::sync::Arc;

use super::model::TranslationModel;
use super::pipeline::TranslationPipeline;
use super::LanguagePair;
use crate::error::Result;
use crate::models::{MarianOptions, OPUS_MT_REPO_TEMPLATE};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, StandardPipelineBuilder};

crate::pipelines::utils::impl_device_methods!(delegated: TranslationPipelineBuilder<M: TranslationModel>);

/// Default cap on generated tokens per translation.
pub const DEFAULT_MAX_LEN: usize = 512;

/// Builder for creating [`TranslationPipeline`] instances.
///
/// # Examples
///
/// ```rust,no_run
/// # use catalan_pipelines::translation::{LanguagePair, TranslationPipelineBuilder};
/// # fn main() -> catalan_pipelines::error::Result<()> {
/// let pair: LanguagePair = "fr-ca".parse()?;
/// let pipeline = TranslationPipelineBuilder::opus_mt(pair)
///     .max_len(256)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TranslationPipelineBuilder<M: TranslationModel>(
    StandardPipelineBuilder<M::Options>,
    usize,
);

impl<M: TranslationModel> TranslationPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self(StandardPipelineBuilder::new(options), DEFAULT_MAX_LEN)
    }

    /// Maximum number of tokens generated per translation.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.1 = max_len;
        self
    }

    /// Builds the pipeline with configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<TranslationPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions,
    {
        BasePipelineBuilder::build(self)
    }
}

impl<M: TranslationModel> BasePipelineBuilder<M> for TranslationPipelineBuilder<M>
where
    M: Send + Sync + 'static,
    M::Options: ModelOptions,
{
    type Pipeline = TranslationPipeline<M>;
    type Options = M::Options;
    type Tokenizer = M::Tokenizer;

    fn options(&self) -> &Self::Options {
        &self.0.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.0.device_request
    }

    fn create_model(options: Self::Options, device: candle_core::Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<M::Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(&self, model: Arc<M>, tokenizer: M::Tokenizer) -> Result<Self::Pipeline> {
        Ok(TranslationPipeline {
            model,
            tokenizer,
            max_len: self.1,
        })
    }
}

impl TranslationPipelineBuilder<super::TranslationMarian> {
    /// Creates a builder for the OPUS-MT Marian model of `pair`.
    pub fn opus_mt(pair: LanguagePair) -> Self {
        let repo = pair.repo_from_template(OPUS_MT_REPO_TEMPLATE);
        Self::new(MarianOptions {
            pair,
            repo,
            tokenizer_repo: None,
        })
    }

    /// Load the model from another hub repo.
    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.0.options.repo = repo.into();
        self
    }

    /// Load `source.spm`, `target.spm` and `vocab.json` from another hub repo.
    pub fn tokenizer_repo(mut self, repo: impl Into<String>) -> Self {
        self.0.options.tokenizer_repo = Some(repo.into());
        self
    }
}
