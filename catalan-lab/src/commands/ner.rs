//! Named-entity recognition command

use std::io::{self, Write};

use anyhow::{Context, Result};
use catalan_pipelines::token_classification::TokenClassificationPipelineBuilder;
use clap::Args;

use super::{announce_loading, RunContext, Tagger};
use crate::format::write_entities;
use crate::repl::{self, Task};

pub const DEFAULT_TEXT: &str =
    "Joan Miró va néixer a Barcelona el 1893 i va estudiar a l'Escola de Belles Arts.";

/// Arguments for the ner command
#[derive(Debug, Args)]
pub struct NerArgs {
    /// Prompt for sentences until 'quit'
    #[arg(short, long)]
    pub interactive: bool,

    /// Sentence to analyze
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Hub repo of the NER model
    #[arg(long, value_name = "REPO", env = "CATALAN_LAB_NER_MODEL")]
    pub model: Option<String>,
}

struct NerTask<T> {
    tagger: T,
}

impl<T: Tagger> NerTask<T> {
    fn intro<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Interactive NER mode")?;
        writeln!(
            out,
            "Model loaded! Enter Catalan text for NER (or 'quit' to exit):"
        )
    }

    fn run_once<W: Write>(&self, text: Option<&str>, out: &mut W) -> Result<()> {
        let text = text.unwrap_or(DEFAULT_TEXT);
        writeln!(out, "Model loaded! NER analysis for: {text}")?;
        let output = self.tagger.tag(text)?;
        write_entities(out, &output.entities)?;
        log::info!(
            "found {} entities in {:?}",
            output.entities.len(),
            output.stats.total_time
        );
        Ok(())
    }
}

impl<T: Tagger> Task for NerTask<T> {
    fn respond<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        let output = self.tagger.tag(text)?;
        writeln!(out, "\nNamed entities in: {text}")?;
        write_entities(out, &output.entities)?;
        writeln!(out)?;
        Ok(())
    }
}

impl NerArgs {
    /// Execute the ner command
    pub fn execute(&self, ctx: &RunContext) -> Result<()> {
        let repo = self.model.as_deref().unwrap_or(&ctx.config.models.ner);

        let mut stdout = io::stdout().lock();
        announce_loading(&mut stdout)?;

        let pipeline = TokenClassificationPipelineBuilder::roberta(repo)
            .device(ctx.device)
            .build()
            .with_context(|| format!("Failed to load NER model '{repo}'"))?;
        let task = NerTask { tagger: pipeline };

        if self.interactive {
            task.intro(&mut stdout)?;
            repl::run(io::stdin().lock(), &mut stdout, &task)?;
            return Ok(());
        }

        task.run_once(self.text.as_deref(), &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fakes::{entity, FakeTagger};
    use std::io::Cursor;

    fn entity_line() -> String {
        format!("{:20} → {:10} (score=0.99) [0-9]\n", "Joan Miró", "PER")
    }

    #[test]
    fn one_shot_without_text_analyzes_default_sentence() {
        let task = NerTask {
            tagger: FakeTagger::with(vec![entity("Joan Miró", "PER", 0.99, 0, 9)]),
        };
        let mut out = Vec::new();
        task.run_once(None, &mut out).unwrap();

        assert_eq!(*task.tagger.seen.borrow(), vec![DEFAULT_TEXT.to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Model loaded! NER analysis for: {DEFAULT_TEXT}\n{}", entity_line())
        );
    }

    #[test]
    fn one_shot_without_entities() {
        let task = NerTask {
            tagger: FakeTagger::default(),
        };
        let mut out = Vec::new();
        task.run_once(Some("Bon dia"), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Model loaded! NER analysis for: Bon dia\nNo named entities found.\n"
        );
    }

    #[test]
    fn interactive_answer_has_header_and_blank_line() {
        let task = NerTask {
            tagger: FakeTagger::with(vec![entity("Joan Miró", "PER", 0.99, 0, 9)]),
        };
        let mut out = Vec::new();
        repl::run(Cursor::new("Joan Miró\n"), &mut out, &task).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "> \nNamed entities in: Joan Miró\n{}\n> \nGoodbye!\n",
                entity_line()
            )
        );
    }

    #[test]
    fn intro_names_the_mode() {
        let task = NerTask {
            tagger: FakeTagger::default(),
        };
        let mut out = Vec::new();
        task.intro(&mut out).unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .starts_with("Interactive NER mode\nModel loaded!"));
    }
}
