use std::sync::Arc;

use super::aggregation::AggregationStrategy;
use super::model::TokenClassificationModel;
use super::pipeline::TokenClassificationPipeline;
use crate::error::Result;
use crate::models::{RobertaOptions, CATALAN_NER_REPO, CATALAN_POS_REPO};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, StandardPipelineBuilder};

crate::pipelines::utils::impl_device_methods!(delegated: TokenClassificationPipelineBuilder<M: TokenClassificationModel>);

/// Builder for creating [`TokenClassificationPipeline`] instances.
///
/// Use [`Self::catalan_pos`], [`Self::catalan_ner`] or [`Self::roberta`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use catalan_pipelines::token_classification::{AggregationStrategy, TokenClassificationPipelineBuilder};
/// # fn main() -> catalan_pipelines::error::Result<()> {
/// let pipeline = TokenClassificationPipelineBuilder::catalan_ner()
///     .aggregation(AggregationStrategy::Simple)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TokenClassificationPipelineBuilder<M: TokenClassificationModel>(
    StandardPipelineBuilder<M::Options>,
    AggregationStrategy,
);

impl<M: TokenClassificationModel> TokenClassificationPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self(
            StandardPipelineBuilder::new(options),
            AggregationStrategy::default(),
        )
    }

    /// How subword predictions are merged. Defaults to [`AggregationStrategy::Simple`].
    pub fn aggregation(mut self, strategy: AggregationStrategy) -> Self {
        self.1 = strategy;
        self
    }

    /// Builds the pipeline with configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<TokenClassificationPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions,
    {
        BasePipelineBuilder::build(self)
    }
}

impl<M: TokenClassificationModel> BasePipelineBuilder<M> for TokenClassificationPipelineBuilder<M>
where
    M: Send + Sync + 'static,
    M::Options: ModelOptions,
{
    type Pipeline = TokenClassificationPipeline<M>;
    type Options = M::Options;
    type Tokenizer = tokenizers::Tokenizer;

    fn options(&self) -> &Self::Options {
        &self.0.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.0.device_request
    }

    fn create_model(options: Self::Options, device: candle_core::Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<tokenizers::Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(
        &self,
        model: Arc<M>,
        tokenizer: tokenizers::Tokenizer,
    ) -> Result<Self::Pipeline> {
        Ok(TokenClassificationPipeline {
            model,
            tokenizer,
            aggregation: self.1,
        })
    }
}

impl TokenClassificationPipelineBuilder<super::TokenClassificationRoberta> {
    /// Creates a builder for any RoBERTa token classification checkpoint on the hub.
    pub fn roberta(repo: impl Into<String>) -> Self {
        Self::new(RobertaOptions::new(repo))
    }

    /// Catalan part-of-speech tagger.
    pub fn catalan_pos() -> Self {
        Self::roberta(CATALAN_POS_REPO)
    }

    /// Catalan named-entity recognizer.
    pub fn catalan_ner() -> Self {
        Self::roberta(CATALAN_NER_REPO)
    }
}
