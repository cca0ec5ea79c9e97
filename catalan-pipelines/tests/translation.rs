//! Downloads the OPUS-MT French-Catalan checkpoint with its SentencePiece models.
//! Run with: cargo test -p catalan-pipelines --features hub-tests

#![cfg(feature = "hub-tests")]

use catalan_pipelines::error::{PipelineError, Result};
use catalan_pipelines::translation::{LanguagePair, TranslationPipelineBuilder};

#[test]
fn translates_french_to_catalan() -> Result<()> {
    let pipeline = TranslationPipelineBuilder::opus_mt(LanguagePair::default())
        .max_len(64)
        .cpu()
        .build()?;
    assert_eq!(pipeline.max_len(), 64);

    let output = pipeline.run("Bienvenue en Catalogne !")?;
    assert!(!output.translation.trim().is_empty());
    assert!(!output.translation.contains("</s>"));
    assert!(!output.translation.contains('▁'));
    assert!(output.translation.contains("Catalunya"));
    Ok(())
}

#[test]
fn empty_text_is_invalid() -> Result<()> {
    let pipeline = TranslationPipelineBuilder::opus_mt(LanguagePair::default())
        .cpu()
        .build()?;

    let err = pipeline.run("  ").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    Ok(())
}
