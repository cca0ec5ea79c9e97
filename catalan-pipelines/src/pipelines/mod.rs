pub(crate) mod cache;
pub(crate) mod stats;
pub(crate) mod utils;

pub mod fill_mask;
pub mod token_classification;
pub mod translation;
