//! Masked language modeling pipeline.
//!
//! Fill-mask predicts the most likely words for the mask token (`<mask>` for
//! RoBERTa models) in a sentence, each with a confidence score and the
//! completed sentence.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalan_pipelines::fill_mask::FillMaskPipelineBuilder;
//!
//! # fn main() -> catalan_pipelines::error::Result<()> {
//! let pipeline = FillMaskPipelineBuilder::catalan().build()?;
//!
//! let output = pipeline.run_top_k("La llengua catalana és <mask> bonica.", 5)?;
//! for pred in &output.predictions {
//!     println!("{}  (score={:.4})", pred.sequence, pred.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Models
//!
//! | Model | Builder Method |
//! |-------|----------------|
//! | `PlanTL-GOB-ES/roberta-base-ca` | [`FillMaskPipelineBuilder::catalan`] |
//! | Any RoBERTa masked LM | [`FillMaskPipelineBuilder::roberta`] |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::RobertaOptions;
pub use crate::pipelines::stats::PipelineStats;
pub use builder::FillMaskPipelineBuilder;
pub use pipeline::{FillMaskPipeline, Output, Prediction, TopKOutput};

/// Only for generic annotations. Use [`FillMaskPipelineBuilder::roberta`].
pub type FillMaskRoberta = crate::models::roberta::FillMaskRobertaModel;
