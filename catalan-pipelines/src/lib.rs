//! Pipelines for Catalan language models in Rust.
//!
//! Powered by [Candle](https://github.com/huggingface/candle), with an API inspired by Python's [Transformers](https://huggingface.co/docs/transformers).
//! Includes pipelines for mask filling, token classification (part-of-speech
//! tagging and named-entity recognition) and machine translation.
//!
//! Pipelines built for the same model and device share its weights while any
//! of them is alive.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod error;

pub use loaders::LabelMap;
pub use models::{
    CATALAN_FILL_MASK_REPO, CATALAN_NER_REPO, CATALAN_POS_REPO, OPUS_MT_REPO_TEMPLATE,
};
pub use pipelines::utils::DeviceRequest;
pub use pipelines::{fill_mask, token_classification, translation};
