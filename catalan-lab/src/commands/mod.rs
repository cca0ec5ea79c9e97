//! CLI command implementations

use std::io::{self, Write};

use catalan_pipelines::token_classification::{
    Output as TagOutput, TokenClassificationPipeline, TokenClassificationRoberta,
};
use catalan_pipelines::DeviceRequest;
use clap::Subcommand;

use crate::config::LabConfig;
use crate::format::LOADING;

pub mod mask;
pub mod ner;
pub mod pos;
pub mod trad;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill the <mask> token of a Catalan sentence with a RoBERTa model
    Mask(mask::MaskArgs),

    /// Tag the parts of speech of a Catalan sentence
    Pos(pos::PosArgs),

    /// Find named entities in a Catalan sentence
    Ner(ner::NerArgs),

    /// Translate text with a Marian (OPUS-MT) model
    Trad(trad::TradArgs),
}

/// Settings every command runs with
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: LabConfig,
    pub device: DeviceRequest,
}

impl Commands {
    pub fn execute(&self, ctx: &RunContext) -> anyhow::Result<()> {
        log::debug!("running {self:?} on {}", ctx.device);
        match self {
            Commands::Mask(args) => args.execute(ctx),
            Commands::Pos(args) => args.execute(ctx),
            Commands::Ner(args) => args.execute(ctx),
            Commands::Trad(args) => args.execute(ctx),
        }
    }
}

/// Token classification as the pos and ner commands use it.
pub(crate) trait Tagger {
    fn tag(&self, text: &str) -> anyhow::Result<TagOutput>;
}

impl Tagger for TokenClassificationPipeline<TokenClassificationRoberta> {
    fn tag(&self, text: &str) -> anyhow::Result<TagOutput> {
        Ok(self.run(text)?)
    }
}

/// Announce a model load; flushed so it shows before the download starts.
pub(crate) fn announce_loading<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{LOADING}")?;
    out.flush()
}
