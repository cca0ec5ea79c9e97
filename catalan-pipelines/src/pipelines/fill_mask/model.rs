use crate::error::Result;
use tokenizers::{Encoding, Tokenizer};

pub trait FillMaskModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Vocabulary distribution at `mask_index` of the encoded input.
    fn mask_probabilities(&self, encoding: &Encoding, mask_index: usize) -> Result<Vec<f32>>;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    fn device(&self) -> &candle_core::Device;
}
