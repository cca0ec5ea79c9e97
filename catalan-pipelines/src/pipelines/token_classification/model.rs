use crate::error::Result;
use crate::loaders::LabelMap;
use tokenizers::{Encoding, Tokenizer};

pub trait TokenClassificationModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Label distribution for every token of the encoded input, special tokens included.
    fn token_probabilities(&self, encoding: &Encoding) -> Result<Vec<Vec<f32>>>;

    fn labels(&self) -> &LabelMap;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    fn device(&self) -> &candle_core::Device;
}
