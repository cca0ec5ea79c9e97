//! Token classification pipeline for part-of-speech tagging and named-entity recognition.
//!
//! Every token gets a label from the model's classification head; with the
//! default [`AggregationStrategy::Simple`] subword pieces are merged back into
//! words and `B-`/`I-` spans into whole entities. Spans labelled `O` are dropped.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalan_pipelines::token_classification::TokenClassificationPipelineBuilder;
//!
//! # fn main() -> catalan_pipelines::error::Result<()> {
//! let pipeline = TokenClassificationPipelineBuilder::catalan_ner().build()?;
//!
//! let output = pipeline.run("Joan Miró va néixer a Barcelona el 1893.")?;
//! for entity in &output.entities {
//!     println!("{} → {} [{}-{}]", entity.word, entity.label, entity.start, entity.end);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Models
//!
//! | Model | Builder Method |
//! |-------|----------------|
//! | `projecte-aina/roberta-base-ca-v2-cased-pos` | [`TokenClassificationPipelineBuilder::catalan_pos`] |
//! | `projecte-aina/roberta-base-ca-v2-cased-ner` | [`TokenClassificationPipelineBuilder::catalan_ner`] |
//! | Any RoBERTa token classifier | [`TokenClassificationPipelineBuilder::roberta`] |

// ============ Internal API ============

pub(crate) mod aggregation;
pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::RobertaOptions;
pub use crate::pipelines::stats::PipelineStats;
pub use aggregation::AggregationStrategy;
pub use builder::TokenClassificationPipelineBuilder;
pub use pipeline::{Entity, Output, TokenClassificationPipeline};

/// Only for generic annotations. Use [`TokenClassificationPipelineBuilder::roberta`].
pub type TokenClassificationRoberta = crate::models::roberta::TokenClassificationRobertaModel;
