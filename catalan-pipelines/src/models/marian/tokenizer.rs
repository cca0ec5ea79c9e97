use std::collections::HashMap;
use std::path::Path;

use sentencepiece::SentencePieceProcessor;

use crate::error::{PipelineError, Result};
use crate::loaders::HfLoader;
use crate::pipelines::translation::TranslationTokenizer;

const EOS_TOKEN: &str = "</s>";
const UNK_TOKEN: &str = "<unk>";
const PAD_TOKEN: &str = "<pad>";

/// OPUS-MT tokenization: SentencePiece pieces looked up in the shared `vocab.json`.
///
/// Source text is split with `source.spm`, generated ids are joined back with
/// `target.spm`.
pub struct MarianTokenizer {
    source: SentencePieceProcessor,
    target: SentencePieceProcessor,
    vocab: Vocab,
}

impl MarianTokenizer {
    pub(crate) fn load(repo: &str) -> Result<Self> {
        let source = open_spm(&HfLoader::new(repo, "source.spm").load()?)?;
        let target = open_spm(&HfLoader::new(repo, "target.spm").load()?)?;

        let vocab_path = HfLoader::new(repo, "vocab.json").load()?;
        let vocab = Vocab::from_json(&std::fs::read_to_string(&vocab_path)?)?;
        log::debug!("loaded {} Marian vocabulary entries from '{repo}'", vocab.len());

        Ok(Self {
            source,
            target,
            vocab,
        })
    }
}

impl TranslationTokenizer for MarianTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let pieces = self
            .source
            .encode(text)
            .map_err(|e| PipelineError::Tokenization(format!("Failed to split text: {e}")))?;
        let pieces: Vec<String> = pieces.into_iter().map(|p| p.piece).collect();

        Ok(self.vocab.ids_of(&pieces))
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let pieces = self.vocab.pieces_of(ids);
        self.target
            .decode_pieces(&pieces)
            .map_err(|e| PipelineError::Tokenization(format!("Failed to decode tokens: {e}")))
    }
}

fn open_spm(path: &Path) -> Result<SentencePieceProcessor> {
    SentencePieceProcessor::open(path).map_err(|e| {
        PipelineError::Tokenization(format!(
            "Failed to load SentencePiece model from '{}': {e}",
            path.display()
        ))
    })
}

/// Piece to id table of a Marian checkpoint.
#[derive(Debug)]
pub(crate) struct Vocab {
    ids: HashMap<String, u32>,
    pieces: HashMap<u32, String>,
    eos: u32,
    unk: u32,
    pad: Option<u32>,
}

impl Vocab {
    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let ids: HashMap<String, u32> = serde_json::from_str(json)?;

        let required = |token: &str| {
            ids.get(token).copied().ok_or_else(|| {
                PipelineError::ModelConfig(format!("vocab.json has no '{token}' entry"))
            })
        };
        let eos = required(EOS_TOKEN)?;
        let unk = required(UNK_TOKEN)?;
        let pad = ids.get(PAD_TOKEN).copied();

        let pieces = ids.iter().map(|(piece, &id)| (id, piece.clone())).collect();

        Ok(Self {
            ids,
            pieces,
            eos,
            unk,
            pad,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    /// Ids of `pieces` followed by the end-of-sentence id; unknown pieces map to `<unk>`.
    pub(crate) fn ids_of<S: AsRef<str>>(&self, pieces: &[S]) -> Vec<u32> {
        pieces
            .iter()
            .map(|piece| self.ids.get(piece.as_ref()).copied().unwrap_or(self.unk))
            .chain(std::iter::once(self.eos))
            .collect()
    }

    /// Pieces of `ids` with special and unknown ids skipped.
    pub(crate) fn pieces_of(&self, ids: &[u32]) -> Vec<&str> {
        ids.iter()
            .filter(|&&id| id != self.eos && id != self.unk && Some(id) != self.pad)
            .filter_map(|id| self.pieces.get(id).map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB: &str = r#"{"</s>": 0, "<unk>": 1, "▁Bon": 2, "▁dia": 3, "!": 4, "<pad>": 5}"#;

    #[test]
    fn pieces_map_to_ids_with_trailing_eos() {
        let vocab = Vocab::from_json(VOCAB).unwrap();
        assert_eq!(vocab.ids_of(&["▁Bon", "▁dia", "!"]), vec![2, 3, 4, 0]);
    }

    #[test]
    fn unknown_pieces_become_unk() {
        let vocab = Vocab::from_json(VOCAB).unwrap();
        assert_eq!(vocab.ids_of(&["▁Bonjour"]), vec![1, 0]);
        assert_eq!(vocab.ids_of::<&str>(&[]), vec![0]);
    }

    #[test]
    fn special_ids_are_skipped_when_decoding() {
        let vocab = Vocab::from_json(VOCAB).unwrap();
        assert_eq!(vocab.pieces_of(&[5, 2, 1, 3, 4, 0]), vec!["▁Bon", "▁dia", "!"]);
        assert!(vocab.pieces_of(&[999]).is_empty());
    }

    #[test]
    fn vocab_needs_end_of_sentence_token() {
        let err = Vocab::from_json(r#"{"<unk>": 1, "a": 2}"#).unwrap_err();
        assert!(matches!(err, PipelineError::ModelConfig(_)));
        assert!(err.to_string().contains("</s>"));
    }

    #[test]
    fn pad_token_is_optional() {
        let vocab = Vocab::from_json(r#"{"</s>": 0, "<unk>": 1}"#).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.pad, None);
    }
}
