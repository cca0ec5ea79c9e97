use crate::error::Result;

pub trait TranslationModel {
    type Options: std::fmt::Debug + Clone;

    type Tokenizer: TranslationTokenizer;

    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Target-language token ids for the source ids, without start or end markers.
    fn generate(&self, source_ids: &[u32], max_len: usize) -> Result<Vec<u32>>;

    fn get_tokenizer(options: Self::Options) -> Result<Self::Tokenizer>;

    fn device(&self) -> &candle_core::Device;
}

/// Maps text to model ids on the source side and ids back to text on the target side.
pub trait TranslationTokenizer {
    /// Source-language ids, ending with the end-of-sentence id.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Target-language text, special tokens skipped.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}
