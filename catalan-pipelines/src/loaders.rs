use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};

const MAX_DOWNLOAD_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> Result<PathBuf> {
        let hf_api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| {
                PipelineError::Download(format!("Failed to initialize HuggingFace API: {e}"))
            })?;
        let hf_repo = hf_api.model(self.repo.clone());

        let mut attempts = 0u32;

        for attempt in 0..MAX_DOWNLOAD_ATTEMPTS {
            log::debug!("fetching '{}' from '{}'", self.filename, self.repo);
            match hf_repo.get(self.filename.as_str()) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    attempts = attempt + 1;
                    if error_msg.contains("Lock acquisition failed")
                        && attempt < MAX_DOWNLOAD_ATTEMPTS - 1
                    {
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        log::info!(
                            "hub cache locked for '{}', retrying in {:?}",
                            self.filename,
                            wait_time
                        );
                        std::thread::sleep(wait_time);
                        continue;
                    }
                    return Err(PipelineError::Download(format!(
                        "Failed to download '{}' from '{}': {}",
                        self.filename, self.repo, error_msg
                    )));
                }
            }
        }

        Err(PipelineError::Download(format!(
            "Download timed out for '{}' from '{}' after {} attempt(s)",
            self.filename, self.repo, attempts
        )))
    }
}

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        let tokenizer_file_loader = HfLoader::new(repo, filename);

        Self {
            tokenizer_file_loader,
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;
        let path_str = tokenizer_file_path.display().to_string();

        let tokenizer = Tokenizer::from_file(&tokenizer_file_path).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Failed to load tokenizer from '{}': {}",
                path_str, e
            ))
        })?;

        Ok(tokenizer)
    }
}

/// `config.json` contents plus a weight-backed [`VarBuilder`].
pub struct LoadedWeights {
    pub config_json: String,
    pub vb: VarBuilder<'static>,
}

/// Downloads `config.json` and the weights of a hub repo.
///
/// Prefers `model.safetensors` and falls back to `pytorch_model.bin`.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
}

impl WeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    pub fn load(&self, device: &Device) -> Result<LoadedWeights> {
        let config_path = HfLoader::new(&self.repo, "config.json").load()?;
        let weights_path = with_fallback(
            || HfLoader::new(&self.repo, "model.safetensors").load(),
            || HfLoader::new(&self.repo, "pytorch_model.bin").load(),
        )?;

        let config_json = std::fs::read_to_string(&config_path)?;
        let vb = var_builder(&weights_path, device)?;

        log::info!("loaded weights for '{}' from {}", self.repo, weights_path.display());

        Ok(LoadedWeights { config_json, vb })
    }
}

/// Try `primary`, then `fallback`; when both fail the error names both causes.
fn with_fallback<T>(
    primary: impl FnOnce() -> Result<T>,
    fallback: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let first = match primary() {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    log::debug!("primary weights unavailable, trying fallback: {first}");

    fallback().map_err(|second| {
        PipelineError::Download(format!("{first}; fallback also failed: {second}"))
    })
}

fn var_builder(weights_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
        // SAFETY: the hub cache file is not modified while mapped.
        unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
    } else {
        VarBuilder::from_pth(weights_path, DType::F32, device)?
    };
    Ok(vb)
}

#[derive(Deserialize)]
struct RawLabelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Class labels of a classification head, indexed by class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Parse `id2label` from a model's `config.json`.
    ///
    /// Ids must be contiguous from `0`.
    pub fn from_config_json(config_json: &str) -> Result<Self> {
        let raw: RawLabelConfig = serde_json::from_str(config_json)?;
        if raw.id2label.is_empty() {
            return Err(PipelineError::ModelConfig(
                "config.json has no 'id2label'; not a token classification model".into(),
            ));
        }

        let mut indexed = raw
            .id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|id| (id, label))
                    .map_err(|_| PipelineError::ModelConfig(format!("Invalid label id '{id}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(id, _)| *id);

        for (expected, (id, _)) in indexed.iter().enumerate() {
            if *id != expected {
                return Err(PipelineError::ModelConfig(format!(
                    "Label ids are not contiguous: expected {expected}, found {id}"
                )));
            }
        }

        Ok(Self {
            labels: indexed.into_iter().map(|(_, label)| label).collect(),
        })
    }

    /// Label of class `id`.
    pub fn get(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no classes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
