//! Mask filling command

use std::io::{self, Write};

use anyhow::{Context, Result};
use catalan_pipelines::fill_mask::{
    FillMaskPipeline, FillMaskPipelineBuilder, FillMaskRoberta, TopKOutput,
};
use clap::Args;

use super::{announce_loading, RunContext};
use crate::config::check_top_k;
use crate::format::write_mask_predictions;
use crate::repl::{self, Task};

/// Used when no text, or an empty one, is given.
pub const DEFAULT_TEXT: &str = "La llengua catalana és <mask> bonica.";

/// Arguments for the mask command
#[derive(Debug, Args)]
pub struct MaskArgs {
    /// Prompt for sentences until 'quit'
    #[arg(short, long)]
    pub interactive: bool,

    /// Sentence containing one <mask> token
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Number of predictions to show [default: 5]
    #[arg(long, value_name = "K", env = "CATALAN_LAB_TOP_K")]
    pub top_k: Option<usize>,

    /// Hub repo of the masked language model
    #[arg(long, value_name = "REPO", env = "CATALAN_LAB_MASK_MODEL")]
    pub model: Option<String>,
}

/// Top-k mask filling as the mask command uses it.
pub(crate) trait MaskFiller {
    fn fill(&self, text: &str, k: usize) -> Result<TopKOutput>;

    fn mask_token(&self) -> &str;
}

impl MaskFiller for FillMaskPipeline<FillMaskRoberta> {
    fn fill(&self, text: &str, k: usize) -> Result<TopKOutput> {
        Ok(self.run_top_k(text, k)?)
    }

    fn mask_token(&self) -> &str {
        FillMaskPipeline::mask_token(self)
    }
}

struct MaskTask<F> {
    filler: F,
    top_k: usize,
}

impl<F: MaskFiller> MaskTask<F> {
    fn intro<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Interactive mask filling mode")?;
        writeln!(
            out,
            "Model loaded! Enter Catalan text with {} token (or 'quit' to exit):",
            self.filler.mask_token()
        )
    }

    fn run_once<W: Write>(&self, text: Option<&str>, out: &mut W) -> Result<()> {
        let text = one_shot_text(text);
        writeln!(out, "Model loaded! Filling mask for: {text}")?;
        let output = self.filler.fill(text, self.top_k)?;
        write_mask_predictions(out, &output.predictions)?;
        log::info!("filled mask in {:?}", output.stats.total_time);
        Ok(())
    }
}

impl<F: MaskFiller> Task for MaskTask<F> {
    fn respond<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        let output = self.filler.fill(text, self.top_k)?;
        writeln!(out, "\nPredictions for: {text}")?;
        write_mask_predictions(out, &output.predictions)?;
        writeln!(out)?;
        Ok(())
    }
}

impl MaskArgs {
    /// Execute the mask command
    pub fn execute(&self, ctx: &RunContext) -> Result<()> {
        let top_k = check_top_k(self.top_k.unwrap_or(ctx.config.mask.top_k))?;
        let repo = self.model.as_deref().unwrap_or(&ctx.config.models.mask);

        let mut stdout = io::stdout().lock();
        announce_loading(&mut stdout)?;

        let pipeline = FillMaskPipelineBuilder::roberta(repo)
            .device(ctx.device)
            .build()
            .with_context(|| format!("Failed to load fill-mask model '{repo}'"))?;
        let task = MaskTask {
            filler: pipeline,
            top_k,
        };

        if self.interactive {
            task.intro(&mut stdout)?;
            repl::run(io::stdin().lock(), &mut stdout, &task)?;
            return Ok(());
        }

        task.run_once(self.text.as_deref(), &mut stdout)
    }
}

fn one_shot_text(text: Option<&str>) -> &str {
    text.filter(|t| !t.trim().is_empty()).unwrap_or(DEFAULT_TEXT)
}
