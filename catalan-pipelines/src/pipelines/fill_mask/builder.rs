use std::sync::Arc;

use super::model::FillMaskModel;
use super::pipeline::{mask_token_of, FillMaskPipeline};
use crate::error::Result;
use crate::models::{RobertaOptions, CATALAN_FILL_MASK_REPO};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, StandardPipelineBuilder};

crate::pipelines::utils::impl_device_methods!(delegated: FillMaskPipelineBuilder<M: FillMaskModel>);

/// Builder for creating [`FillMaskPipeline`] instances.
///
/// Use [`Self::catalan`] or [`Self::roberta`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use catalan_pipelines::fill_mask::FillMaskPipelineBuilder;
/// # fn main() -> catalan_pipelines::error::Result<()> {
/// let pipeline = FillMaskPipelineBuilder::catalan().cpu().build()?;
/// # Ok(())
/// # }
/// ```
pub struct FillMaskPipelineBuilder<M: FillMaskModel>(StandardPipelineBuilder<M::Options>);

impl<M: FillMaskModel> FillMaskPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self(StandardPipelineBuilder::new(options))
    }

    /// Builds the pipeline with configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<FillMaskPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions,
    {
        BasePipelineBuilder::build(self)
    }
}

impl<M: FillMaskModel> BasePipelineBuilder<M> for FillMaskPipelineBuilder<M>
where
    M: Send + Sync + 'static,
    M::Options: ModelOptions,
{
    type Pipeline = FillMaskPipeline<M>;
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
        let mask_token = mask_token_of(&tokenizer)?;
        Ok(FillMaskPipeline {
            model,
            tokenizer,
            mask_token,
        })
    }
}

impl FillMaskPipelineBuilder<super::FillMaskRoberta> {
    /// Creates a builder for any RoBERTa masked-LM checkpoint on the hub.
    pub fn roberta(repo: impl Into<String>) -> Self {
        Self::new(RobertaOptions::new(repo))
    }

    /// Creates a builder for the Catalan RoBERTa base model.
    pub fn catalan() -> Self {
        Self::roberta(CATALAN_FILL_MASK_REPO)
    }
}
