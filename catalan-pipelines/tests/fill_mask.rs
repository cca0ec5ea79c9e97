//! Downloads the Catalan RoBERTa checkpoint.
//! Run with: cargo test -p catalan-pipelines --features hub-tests

#![cfg(feature = "hub-tests")]

use catalan_pipelines::error::{PipelineError, Result};
use catalan_pipelines::fill_mask::FillMaskPipelineBuilder;

#[test]
fn fill_mask_top_k() -> Result<()> {
    let pipeline = FillMaskPipelineBuilder::catalan().cpu().build()?;
    assert_eq!(pipeline.mask_token(), "<mask>");

    let output = pipeline.run_top_k("La llengua catalana és <mask> bonica.", 5)?;
    assert_eq!(output.predictions.len(), 5);

    for pair in output.predictions.windows(2) {
        assert!(pair[0].score >= pair[1].score, "predictions sorted best first");
    }
    for prediction in &output.predictions {
        assert!(!prediction.token.is_empty());
        assert!(prediction.score > 0.0 && prediction.score <= 1.0);
        assert!(prediction.sequence.starts_with("La llengua catalana és"));
        assert!(!prediction.sequence.contains("<mask>"));
    }
    Ok(())
}

#[test]
fn fill_mask_requires_the_mask_token() -> Result<()> {
    let pipeline = FillMaskPipelineBuilder::catalan().cpu().build()?;

    let err = pipeline.run("La llengua catalana és bonica.").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(pipeline.run("").is_err());
    assert!(pipeline.run("<mask> i <mask>").is_err());
    Ok(())
}
