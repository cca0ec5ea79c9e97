// ============ Model implementations ============

pub(crate) mod marian;
pub(crate) mod roberta;

pub use marian::MarianOptions;
pub use roberta::RobertaOptions;

/// Catalan RoBERTa base model used for mask filling.
pub const CATALAN_FILL_MASK_REPO: &str = "PlanTL-GOB-ES/roberta-base-ca";

/// Catalan RoBERTa fine-tuned for part-of-speech tagging.
pub const CATALAN_POS_REPO: &str = "projecte-aina/roberta-base-ca-v2-cased-pos";

/// Catalan RoBERTa fine-tuned for named-entity recognition.
pub const CATALAN_NER_REPO: &str = "projecte-aina/roberta-base-ca-v2-cased-ner";

/// Hub repo pattern of the OPUS-MT Marian models; `{src}` and `{tgt}` are language codes.
pub const OPUS_MT_REPO_TEMPLATE: &str = "Helsinki-NLP/opus-mt-{src}-{tgt}";
