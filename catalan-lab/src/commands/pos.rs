//! Part-of-speech tagging command

use std::io::{self, Write};

use anyhow::{Context, Result};
use catalan_pipelines::token_classification::TokenClassificationPipelineBuilder;
use clap::Args;

use super::{announce_loading, RunContext, Tagger};
use crate::format::write_pos_tags;
use crate::repl::{self, Task};

pub const DEFAULT_TEXT: &str = "El gat negre dorm tranquil·lament.";

/// Arguments for the pos command
#[derive(Debug, Args)]
pub struct PosArgs {
    /// Prompt for sentences until 'quit'
    #[arg(short, long)]
    pub interactive: bool,

    /// Sentence to tag
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Hub repo of the POS tagging model
    #[arg(long, value_name = "REPO", env = "CATALAN_LAB_POS_MODEL")]
    pub model: Option<String>,
}

struct PosTask<T> {
    tagger: T,
}

impl<T: Tagger> PosTask<T> {
    fn intro<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Interactive POS tagging mode")?;
        writeln!(
            out,
            "Model loaded! Enter Catalan text for POS tagging (or 'quit' to exit):"
        )
    }

    fn run_once<W: Write>(&self, text: Option<&str>, out: &mut W) -> Result<()> {
        let text = text.unwrap_or(DEFAULT_TEXT);
        writeln!(out, "Model loaded! POS tagging for: {text}")?;
        let output = self.tagger.tag(text)?;
        write_pos_tags(out, &output.entities)?;
        log::info!("tagged in {:?}", output.stats.total_time);
        Ok(())
    }
}

impl<T: Tagger> Task for PosTask<T> {
    fn respond<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        let output = self.tagger.tag(text)?;
        writeln!(out, "\nPOS tags for: {text}")?;
        write_pos_tags(out, &output.entities)?;
        writeln!(out)?;
        Ok(())
    }
}

impl PosArgs {
    /// Execute the pos command
    pub fn execute(&self, ctx: &RunContext) -> Result<()> {
        let repo = self.model.as_deref().unwrap_or(&ctx.config.models.pos);

        let mut stdout = io::stdout().lock();
        announce_loading(&mut stdout)?;

        let pipeline = TokenClassificationPipelineBuilder::roberta(repo)
            .device(ctx.device)
            .build()
            .with_context(|| format!("Failed to load POS model '{repo}'"))?;
        log::debug!("POS model predicts {} tags", pipeline.labels().len());
        let task = PosTask { tagger: pipeline };

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

    fn task() -> PosTask<FakeTagger> {
        PosTask {
            tagger: FakeTagger::with(vec![entity("gat", "NOUN", 0.98, 3, 6)]),
        }
    }

    fn tag_line() -> String {
        format!("{:15} → NOUN (score=0.98)\n", "gat")
    }

    #[test]
    fn one_shot_without_text_tags_default_sentence() {
        let task = task();
        let mut out = Vec::new();
        task.run_once(None, &mut out).unwrap();

        assert_eq!(*task.tagger.seen.borrow(), vec![DEFAULT_TEXT.to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Model loaded! POS tagging for: {DEFAULT_TEXT}\n{}", tag_line())
        );
    }

    #[test]
    fn one_shot_keeps_given_text() {
        let task = task();
        task.run_once(Some("El gat"), &mut Vec::new()).unwrap();
        assert_eq!(*task.tagger.seen.borrow(), vec!["El gat".to_string()]);
    }

    #[test]
    fn interactive_answer_has_header_and_blank_line() {
        let task = task();
        let mut out = Vec::new();
        repl::run(Cursor::new("El gat\nquit\n"), &mut out, &task).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("> \nPOS tags for: El gat\n{}\n> Goodbye!\n", tag_line())
        );
    }

    #[test]
    fn intro_names_the_mode() {
        let mut out = Vec::new();
        task().intro(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Interactive POS tagging mode\n"));
        assert!(out.contains("(or 'quit' to exit):"));
    }
}
