use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Source and target language of a translation model, e.g. `fr-ca`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    source: String,
    target: String,
}

impl LanguagePair {
    /// Build a pair from two ISO 639 codes (2 or 3 ASCII letters).
    pub fn new(source: &str, target: &str) -> Result<Self, PipelineError> {
        let source = normalize_code(source)?;
        let target = normalize_code(target)?;
        if source == target {
            return Err(PipelineError::InvalidInput(format!(
                "Source and target language are both '{source}'"
            )));
        }
        Ok(Self { source, target })
    }

    /// Source language code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target language code.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Fill `{src}` and `{tgt}` in a hub repo template.
    pub fn repo_from_template(&self, template: &str) -> String {
        template
            .replace("{src}", &self.source)
            .replace("{tgt}", &self.target)
    }
}

impl Default for LanguagePair {
    /// French to Catalan.
    fn default() -> Self {
        Self {
            source: "fr".into(),
            target: "ca".into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl FromStr for LanguagePair {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, target) = s.trim().split_once('-').ok_or_else(|| {
            PipelineError::InvalidInput(format!(
                "Invalid language combination '{s}'. Expected 'src-tgt', e.g. 'fr-ca'."
            ))
        })?;
        Self::new(source, target)
    }
}

fn normalize_code(code: &str) -> Result<String, PipelineError> {
    let code = code.trim();
    if (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_lowercase())
    } else {
        Err(PipelineError::InvalidInput(format!(
            "Invalid language code '{code}'. Expected 2 or 3 letters."
        )))
    }
}
