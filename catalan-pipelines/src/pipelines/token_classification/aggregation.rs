//! Merging per-token labels into word and entity spans.

/// How per-token predictions are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationStrategy {
    /// One entity per token, with the raw model label (`B-PER`, `I-PER`, ...).
    None,
    /// Merge consecutive tokens sharing a tag unless the next one starts a new
    /// `B-` span. Labels without a `B-`/`I-` prefix (e.g. POS tags) continue
    /// the current span.
    #[default]
    Simple,
}

/// Prediction for one non-special token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TokenPrediction {
    pub token_id: u32,
    pub label: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
}

/// Aggregated span before its word is decoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Span {
    pub label: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
    pub token_ids: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Begin,
    Inside,
}

fn split_tag(label: &str) -> (Position, &str) {
    if let Some(tag) = label.strip_prefix("B-") {
        (Position::Begin, tag)
    } else if let Some(tag) = label.strip_prefix("I-") {
        (Position::Inside, tag)
    } else {
        (Position::Inside, label)
    }
}

const OUTSIDE: &str = "O";

pub(crate) fn aggregate(tokens: Vec<TokenPrediction>, strategy: AggregationStrategy) -> Vec<Span> {
    let spans = match strategy {
        AggregationStrategy::None => tokens.into_iter().map(single_token_span).collect(),
        AggregationStrategy::Simple => group_tokens(tokens),
    };

    spans
        .into_iter()
        .filter(|span| span.label != OUTSIDE)
        .collect()
}

fn single_token_span(token: TokenPrediction) -> Span {
    Span {
        label: token.label,
        score: token.score,
        start: token.start,
        end: token.end,
        token_ids: vec![token.token_id],
    }
}

fn group_tokens(tokens: Vec<TokenPrediction>) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Vec<TokenPrediction> = Vec::new();

    for token in tokens {
        let joins = current.last().is_some_and(|last| {
            let (position, tag) = split_tag(&token.label);
            let (_, last_tag) = split_tag(&last.label);
            tag == last_tag && position != Position::Begin
        });

        if !joins && !current.is_empty() {
            spans.push(merge(std::mem::take(&mut current)));
        }
        current.push(token);
    }

    if !current.is_empty() {
        spans.push(merge(current));
    }

    spans
}

fn merge(tokens: Vec<TokenPrediction>) -> Span {
    let label = split_tag(&tokens[0].label).1.to_string();
    let score = tokens.iter().map(|t| t.score).sum::<f32>() / tokens.len() as f32;
    let start = tokens[0].start;
    let end = tokens[tokens.len() - 1].end;

    Span {
        label,
        score,
        start,
        end,
        token_ids: tokens.into_iter().map(|t| t.token_id).collect(),
    }
}

/// Strip SentencePiece (`▁`) and WordPiece (`##`) markers.
pub(crate) fn clean_word(word: &str) -> String {
    word.replace('▁', "").replace("##", "").trim().to_string()
}
