//! Translation command

use std::io::{self, Write};

use anyhow::{Context, Result};
use catalan_pipelines::translation::{
    LanguagePair, Output, TranslationMarian, TranslationPipeline, TranslationPipelineBuilder,
};
use clap::Args;

use super::{announce_loading, RunContext};
use crate::config::{check_max_length, TranslationConfig};
use crate::error::LabError;
use crate::repl::{self, Task};

pub const DEFAULT_TEXT: &str = "Bienvenue en Catalogne !";

const FAREWELL: &str = "Adéu!";

/// Arguments for the trad command
#[derive(Debug, Args)]
pub struct TradArgs {
    /// Prompt for text until 'quit'
    #[arg(short, long)]
    pub interactive: bool,

    /// Text to translate
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Language combination as source-target codes
    #[arg(long, value_name = "SRC-TGT", default_value = "fr-ca")]
    pub combination: String,

    /// Maximum number of generated tokens [default: 512]
    #[arg(long, value_name = "N", env = "CATALAN_LAB_MAX_LENGTH")]
    pub max_length: Option<usize>,

    /// Hub repo of the translation model, instead of the configured template
    #[arg(long, value_name = "REPO", env = "CATALAN_LAB_TRAD_MODEL")]
    pub model: Option<String>,
}

/// Translation as the trad command uses it.
pub(crate) trait Translator {
    fn translate(&self, text: &str) -> Result<Output>;
}

impl Translator for TranslationPipeline<TranslationMarian> {
    fn translate(&self, text: &str) -> Result<Output> {
        Ok(self.run(text)?)
    }
}

struct TradTask<T> {
    translator: T,
}

impl<T: Translator> TradTask<T> {
    fn intro<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Enter text to be translated (or 'quit' to exit):")
    }

    fn run_once<W: Write>(&self, text: Option<&str>, out: &mut W) -> Result<()> {
        self.respond(text.unwrap_or(DEFAULT_TEXT), out)
    }
}

impl<T: Translator> Task for TradTask<T> {
    // Header first: it is printed even when translation fails.
    fn respond<W: Write>(&self, text: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Translation for: {text}")?;
        out.flush()?;
        let output = self.translator.translate(text)?;
        writeln!(out, "{}", output.translation)?;
        log::info!("translated in {:?}", output.stats.total_time);
        Ok(())
    }

    fn farewell(&self) -> &str {
        FAREWELL
    }
}

impl TradArgs {
    /// Execute the trad command
    pub fn execute(&self, ctx: &RunContext) -> Result<()> {
        let pair = parse_combination(&self.combination)?;
        let max_len =
            check_max_length(self.max_length.unwrap_or(ctx.config.translation.max_length))?;
        let repo = self
            .model
            .clone()
            .unwrap_or_else(|| model_repo(&ctx.config.translation, &pair));

        let mut stdout = io::stdout().lock();
        announce_loading(&mut stdout)?;

        let mut builder = TranslationPipelineBuilder::opus_mt(pair.clone())
            .repo(repo.as_str())
            .max_len(max_len)
            .device(ctx.device);
        if let Some(tokenizer_repo) = &ctx.config.translation.tokenizer_repo {
            builder = builder.tokenizer_repo(tokenizer_repo.as_str());
        }
        let pipeline = builder
            .build()
            .with_context(|| format!("Failed to load {pair} translation model '{repo}'"))?;
        let task = TradTask {
            translator: pipeline,
        };

        if self.interactive {
            task.intro(&mut stdout)?;
            repl::run(io::stdin().lock(), &mut stdout, &task)?;
            return Ok(());
        }

        task.run_once(self.text.as_deref(), &mut stdout)
    }
}

fn parse_combination(combination: &str) -> Result<LanguagePair, LabError> {
    combination.parse().map_err(LabError::Combination)
}

fn model_repo(config: &TranslationConfig, pair: &LanguagePair) -> String {
    pair.repo_from_template(&config.repo_template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fakes::stats;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Answers with a fixed translation, or fails when it has none.
    #[derive(Default)]
    struct FakeTranslator {
        translation: Option<&'static str>,
        seen: RefCell<Vec<String>>,
    }

    impl Translator for FakeTranslator {
        fn translate(&self, text: &str) -> Result<Output> {
            self.seen.borrow_mut().push(text.to_string());
            let Some(translation) = self.translation else {
                anyhow::bail!("decoder failed");
            };
            Ok(Output {
                translation: translation.to_string(),
                stats: stats(),
            })
        }
    }

    fn translating(translation: &'static str) -> TradTask<FakeTranslator> {
        TradTask {
            translator: FakeTranslator {
                translation: Some(translation),
                ..FakeTranslator::default()
            },
        }
    }

    #[test]
    fn one_shot_without_text_translates_default_sentence() {
        let task = translating("Benvinguts a Catalunya!");
        let mut out = Vec::new();
        task.run_once(None, &mut out).unwrap();

        assert_eq!(*task.translator.seen.borrow(), vec![DEFAULT_TEXT.to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Translation for: {DEFAULT_TEXT}\nBenvinguts a Catalunya!\n")
        );
    }

    #[test]
    fn header_is_written_before_a_failed_translation() {
        let task = TradTask {
            translator: FakeTranslator::default(),
        };
        let mut out = Vec::new();
        let err = task.run_once(Some("Bonjour"), &mut out).unwrap_err();

        assert!(err.to_string().contains("decoder failed"));
        assert_eq!(String::from_utf8(out).unwrap(), "Translation for: Bonjour\n");
    }

    #[test]
    fn interactive_session_says_goodbye_in_catalan() {
        let task = translating("Bon dia");
        let mut out = Vec::new();
        repl::run(Cursor::new("Bonjour\nquit\n"), &mut out, &task).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "> Translation for: Bonjour\nBon dia\n> Adéu!\n"
        );
    }

    #[test]
    fn intro_asks_for_text() {
        let mut out = Vec::new();
        translating("").intro(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Enter text to be translated (or 'quit' to exit):\n"
        );
    }

    #[test]
    fn default_combination_is_french_to_catalan() {
        let pair = parse_combination("fr-ca").unwrap();
        assert_eq!(pair.source(), "fr");
        assert_eq!(pair.target(), "ca");
    }

    #[test]
    fn malformed_combination_is_a_lab_error() {
        let err = parse_combination("francais").unwrap_err();
        assert!(matches!(err, LabError::Combination(_)));
        assert!(err.to_string().contains("francais"));
    }

    #[test]
    fn repo_follows_configured_template() {
        let pair = parse_combination("es-ca").unwrap();
        assert_eq!(
            model_repo(&TranslationConfig::default(), &pair),
            "Helsinki-NLP/opus-mt-es-ca"
        );

        let config = TranslationConfig {
            repo_template: "my-org/marian-{src}2{tgt}".into(),
            ..TranslationConfig::default()
        };
        assert_eq!(model_repo(&config, &pair), "my-org/marian-es2ca");
    }
}
