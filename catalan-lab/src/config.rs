//! TOML configuration for model repos and defaults
//!
//! Values given on the command line or through `CATALAN_LAB_*` variables win
//! over the file; the file wins over the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use catalan_pipelines::translation::DEFAULT_MAX_LEN;
use catalan_pipelines::{
    CATALAN_FILL_MASK_REPO, CATALAN_NER_REPO, CATALAN_POS_REPO, OPUS_MT_REPO_TEMPLATE,
};
use serde::Deserialize;

use crate::error::{LabError, LabResult};

/// Predictions shown per masked sentence unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// Complete runner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub models: ModelsConfig,
    pub translation: TranslationConfig,
    pub mask: MaskConfig,
}

/// Hub repos of the RoBERTa checkpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    pub mask: String,
    pub pos: String,
    pub ner: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            mask: CATALAN_FILL_MASK_REPO.to_string(),
            pos: CATALAN_POS_REPO.to_string(),
            ner: CATALAN_NER_REPO.to_string(),
        }
    }
}

/// Translation model lookup and decoding limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    /// Repo name with `{src}` and `{tgt}` placeholders
    pub repo_template: String,
    /// Repo holding `source.spm`, `target.spm` and `vocab.json`, if not the model repo
    pub tokenizer_repo: Option<String>,
    pub max_length: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            repo_template: OPUS_MT_REPO_TEMPLATE.to_string(),
            tokenizer_repo: None,
            max_length: DEFAULT_MAX_LEN,
        }
    }
}

/// Fill-mask defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskConfig {
    pub top_k: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl LabConfig {
    /// Load from `explicit`, or from the per-user file when it exists.
    ///
    /// A missing explicit file is an error; a missing per-user file is not.
    pub fn load(explicit: Option<&Path>) -> LabResult<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(LabError::ConfigNotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    log::debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse and validate a TOML file.
    pub fn from_file(path: &Path) -> LabResult<Self> {
        log::info!("loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| LabError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| LabError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values no command can run with.
    pub fn validate(&self) -> LabResult<()> {
        check_top_k(self.mask.top_k)?;
        check_max_length(self.translation.max_length)?;

        let template = &self.translation.repo_template;
        if !template.contains("{src}") || !template.contains("{tgt}") {
            return Err(LabError::InvalidSetting(format!(
                "translation.repo_template '{template}' must contain {{src}} and {{tgt}}"
            )));
        }

        Ok(())
    }
}

pub(crate) fn check_top_k(top_k: usize) -> LabResult<usize> {
    if top_k == 0 {
        return Err(LabError::InvalidSetting("top-k must be at least 1".into()));
    }
    Ok(top_k)
}

pub(crate) fn check_max_length(max_length: usize) -> LabResult<usize> {
    if max_length == 0 {
        return Err(LabError::InvalidSetting(
            "max-length must be at least 1".into(),
        ));
    }
    Ok(max_length)
}

/// `<config_dir>/catalan-lab/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("catalan-lab").join("config.toml"))
}
