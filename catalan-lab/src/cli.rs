//! Top-level argument parsing

use std::path::PathBuf;

use catalan_pipelines::DeviceRequest;
use clap::{ArgAction, Parser};

use crate::commands::{Commands, RunContext};
use crate::config::LabConfig;

/// Catalan NLP lab: mask filling, POS tagging, NER and translation
#[derive(Debug, Parser)]
#[command(name = "catalan-lab", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file [default: <config dir>/catalan-lab/config.toml]
    #[arg(long, value_name = "FILE", env = "CATALAN_LAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Device to run models on: cpu, cuda or cuda:N
    #[arg(
        long,
        value_name = "DEVICE",
        env = "CATALAN_LAB_DEVICE",
        default_value = "cpu",
        global = true
    )]
    pub device: DeviceRequest,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter for the requested verbosity, `None` when quiet.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return None;
        }
        Some(match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    }

    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if let Some(level) = self.log_level() {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
                .init();
        }
    }

    /// Load configuration and run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        let config = LabConfig::load(self.config.as_deref())?;
        log::debug!("configuration: {config:?}");

        let ctx = RunContext {
            config,
            device: self.device,
        };
        self.command.execute(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("catalan-lab").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mask_defaults() {
        let cli = parse(&["mask"]);
        let Commands::Mask(args) = cli.command else {
            panic!("expected mask");
        };
        assert!(!args.interactive);
        assert_eq!(args.text, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn mask_with_text_and_top_k() {
        let cli = parse(&["mask", "--text", "El meu <mask> favorit", "--top-k", "3"]);
        let Commands::Mask(args) = cli.command else {
            panic!("expected mask");
        };
        assert_eq!(args.text.as_deref(), Some("El meu <mask> favorit"));
        assert_eq!(args.top_k, Some(3));
    }

    #[test]
    fn interactive_short_flag() {
        for command in ["mask", "pos", "ner", "trad"] {
            let cli = parse(&[command, "-i"]);
            let interactive = match cli.command {
                Commands::Mask(args) => args.interactive,
                Commands::Pos(args) => args.interactive,
                Commands::Ner(args) => args.interactive,
                Commands::Trad(args) => args.interactive,
            };
            assert!(interactive, "{command}");
        }
    }

    #[test]
    fn trad_combination_defaults_to_french_catalan() {
        let cli = parse(&["trad"]);
        let Commands::Trad(args) = cli.command else {
            panic!("expected trad");
        };
        assert_eq!(args.combination, "fr-ca");

        let cli = parse(&["trad", "--combination", "es-ca", "--max-length", "64"]);
        let Commands::Trad(args) = cli.command else {
            panic!("expected trad");
        };
        assert_eq!(args.combination, "es-ca");
        assert_eq!(args.max_length, Some(64));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["ner", "-vv", "--device", "cuda:1"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.device, DeviceRequest::Cuda(1));
        assert_eq!(cli.log_level(), Some("debug"));
    }

    #[test]
    fn quiet_disables_logging() {
        let cli = parse(&["-q", "-vvv", "pos"]);
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(parse(&["pos"]).log_level(), Some("warn"));
        assert_eq!(parse(&["-v", "pos"]).log_level(), Some("info"));
        assert_eq!(parse(&["-vvvv", "pos"]).log_level(), Some("trace"));
    }

    #[test]
    fn unknown_device_is_rejected() {
        let result = Cli::try_parse_from(["catalan-lab", "--device", "tpu", "mask"]);
        assert!(result.is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["catalan-lab"]).is_err());
    }
}
