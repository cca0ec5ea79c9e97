//! Machine translation pipeline.
//!
//! Runs Marian encoder-decoder models (the OPUS-MT family) with greedy
//! decoding. The language pair selects the hub repo
//! `Helsinki-NLP/opus-mt-{src}-{tgt}` unless another repo is given.
//!
//! Text is split with the repo's `source.spm`/`target.spm` SentencePiece
//! models and mapped to model ids through its `vocab.json`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalan_pipelines::translation::{LanguagePair, TranslationPipelineBuilder};
//!
//! # fn main() -> catalan_pipelines::error::Result<()> {
//! let pipeline = TranslationPipelineBuilder::opus_mt("fr-ca".parse::<LanguagePair>()?).build()?;
//! println!("{}", pipeline.run("Bienvenue en Catalogne !")?.translation);
//! # Ok(())
//! # }
//! ```

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod language;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::marian::MarianTokenizer;
pub use crate::models::MarianOptions;
pub use crate::pipelines::stats::PipelineStats;
pub use builder::{TranslationPipelineBuilder, DEFAULT_MAX_LEN};
pub use language::LanguagePair;
pub use model::TranslationTokenizer;
pub use pipeline::{Output, TranslationPipeline};

/// Only for generic annotations. Use [`TranslationPipelineBuilder::opus_mt`].
pub type TranslationMarian = crate::models::marian::MarianTranslationModel;
