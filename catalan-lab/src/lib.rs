//! Catalan NLP lab
//!
//! Command-line runner over the `catalan-pipelines` crate: mask filling,
//! part-of-speech tagging, named-entity recognition and translation, each
//! usable one-shot or as an interactive prompt.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod repl;

pub use error::{LabError, LabResult};
